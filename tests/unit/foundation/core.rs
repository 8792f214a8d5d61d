use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::integer(30).unwrap(), Fps { num: 30, den: 1 });
}

#[test]
fn frame_time_is_index_over_fps() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.frame_time_secs(FrameIndex(0)), 0.0);
    assert_eq!(fps.frame_time_secs(FrameIndex(15)), 0.5);
    assert_eq!(fps.frame_time_secs(FrameIndex(30)), 1.0);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert!((ntsc.frame_time_secs(FrameIndex(30000)) - 1001.0).abs() < 1e-9);
}

#[test]
fn secs_to_frames_rounds_partial_frames_up() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(1.0), 30);
    assert_eq!(fps.secs_to_frames_ceil(2.0), 60);
    assert_eq!(fps.secs_to_frames_ceil(1.01), 31);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);
}

#[test]
fn canvas_byte_lengths() {
    let c = Canvas {
        width: 4,
        height: 2,
    };
    assert_eq!(c.rgba_len(), 32);
    assert_eq!(c.rgb_len(), 24);
}
