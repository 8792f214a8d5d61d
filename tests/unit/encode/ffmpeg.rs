use super::*;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::core::{Canvas, Rgb8};

fn sink_cfg(width: u32, height: u32, audio: Option<PathBuf>) -> SinkConfig {
    SinkConfig {
        canvas: Canvas { width, height },
        fps: Fps::integer(30).unwrap(),
        total_frames: 3,
        background: Rgb8::new(0, 0, 0),
        audio: audio.map(|path| AudioInputConfig { path }),
    }
}

fn args_as_strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

fn opaque_frame(width: u32, height: u32) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: [12u8, 34, 56, 255].repeat((width * height) as usize),
        premultiplied: true,
    }
}

#[test]
fn args_mux_audio_and_trim_to_shortest() {
    let opts = FfmpegSinkOpts::new("out/song.mp4");
    let args = args_as_strings(&encoder_args(
        &opts,
        &sink_cfg(1920, 1080, Some(PathBuf::from("in/song.mp3"))),
    ));
    let expected = [
        "-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s", "1920x1080", "-r",
        "30/1", "-i", "pipe:0", "-i", "in/song.mp3", "-c:v", "libx264", "-preset", "fast", "-crf",
        "18", "-pix_fmt", "yuv420p", "-c:a", "aac", "-b:a", "192k", "-shortest", "-movflags",
        "+faststart", "out/song.mp4",
    ];
    assert_eq!(args, expected);
}

#[test]
fn args_without_audio_disable_the_audio_stream() {
    let mut opts = FfmpegSinkOpts::new("v.mp4");
    opts.overwrite = false;
    let args = args_as_strings(&encoder_args(&opts, &sink_cfg(64, 32, None)));
    assert_eq!(args[0], "-n");
    assert!(args.contains(&"-an".to_string()));
    assert!(!args.contains(&"-shortest".to_string()));
    assert_eq!(args.iter().filter(|a| *a == "-i").count(), 1);
    assert_eq!(args.last().map(String::as_str), Some("v.mp4"));
}

#[test]
fn begin_rejects_odd_canvas_and_missing_audio() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("o.mp4")));
    assert!(matches!(
        sink.begin(sink_cfg(63, 32, None)),
        Err(LyricError::Validation(_))
    ));
    assert!(matches!(
        sink.begin(sink_cfg(64, 32, Some(dir.path().join("missing.wav")))),
        Err(LyricError::Validation(_))
    ));
}

#[test]
fn begin_refuses_existing_output_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("taken.mp4");
    std::fs::write(&out, b"keep me").unwrap();
    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;

    let mut sink = FfmpegSink::new(opts);
    assert!(matches!(
        sink.begin(sink_cfg(64, 32, None)),
        Err(LyricError::Validation(_))
    ));
    drop(sink);
    assert_eq!(std::fs::read(&out).unwrap(), b"keep me");
}

#[test]
fn spawn_failure_is_an_encoder_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = FfmpegSinkOpts::new(dir.path().join("o.mp4"));
    opts.program = dir.path().join("no-such-encoder");
    let mut sink = FfmpegSink::new(opts);
    let err = sink.begin(sink_cfg(64, 32, None)).unwrap_err();
    assert!(matches!(err, LyricError::EncoderProcess(_)));
    assert!(err.to_string().contains("no-such-encoder"));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    assert!(sink.push_frame(FrameIndex(0), &opaque_frame(2, 2)).is_err());
    assert!(sink.end().is_err());
}

#[cfg(unix)]
fn fake_encoder(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;
    let path = dir.join("fake-encoder.sh");
    std::fs::write(&path, format!("#!/bin/sh\nfor a; do out=\"$a\"; done\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn out_of_order_frames_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = FfmpegSinkOpts::new(dir.path().join("o.rgb"));
    opts.program = fake_encoder(dir.path(), "cat > \"$out\"");
    let mut sink = FfmpegSink::new(opts);
    sink.begin(sink_cfg(4, 2, None)).unwrap();

    let frame = opaque_frame(4, 2);
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame).is_err());
    assert!(sink.push_frame(FrameIndex(2), &opaque_frame(2, 2)).is_err());
    sink.push_frame(FrameIndex(2), &frame).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames_written(), 3);

    // 4x2 pixels of RGB24 per frame, flattened from opaque RGBA.
    let bytes = std::fs::read(dir.path().join("o.rgb")).unwrap();
    assert_eq!(bytes.len(), 3 * 4 * 2 * 3);
    assert_eq!(&bytes[..3], &[12, 34, 56]);
}

#[cfg(unix)]
#[test]
fn dropping_an_unfinished_sink_removes_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("partial.mp4");
    std::fs::write(&out, b"stale").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.program = fake_encoder(dir.path(), "cat > /dev/null");
    let mut sink = FfmpegSink::new(opts);
    sink.begin(sink_cfg(4, 2, None)).unwrap();
    sink.push_frame(FrameIndex(0), &opaque_frame(4, 2)).unwrap();
    drop(sink);

    assert!(!out.exists());
}

#[cfg(unix)]
#[test]
fn non_zero_exit_reports_stderr_and_removes_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bad.mp4");
    let mut opts = FfmpegSinkOpts::new(&out);
    opts.program = fake_encoder(
        dir.path(),
        "cat > \"$out\"\necho 'codec exploded' >&2\nexit 7",
    );
    let mut sink = FfmpegSink::new(opts);
    sink.begin(sink_cfg(4, 2, None)).unwrap();
    sink.push_frame(FrameIndex(0), &opaque_frame(4, 2)).unwrap();

    let err = sink.end().unwrap_err();
    assert!(matches!(err, LyricError::EncoderProcess(_)));
    assert!(err.to_string().contains("codec exploded"));
    assert!(!out.exists());
}
