use super::*;

#[test]
fn defaults_match_the_classic_karaoke_layout() {
    let cfg = RenderConfig::default();
    assert_eq!(
        cfg.canvas,
        Canvas {
            width: 1920,
            height: 1080
        }
    );
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.line_words, 8);
    assert_eq!(cfg.grace_secs, 2.0);
    assert_eq!(cfg.font.size_px, 72.0);
    cfg.validate().unwrap();
}

#[test]
fn line_tops_straddle_the_vertical_center() {
    let cfg = RenderConfig::default();
    // 540 - 55 - 36 and 540 + 55 - 36
    assert_eq!(cfg.line_top_px(0), 449.0);
    assert_eq!(cfg.line_top_px(1), 559.0);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: RenderConfig =
        serde_json::from_str(r#"{ "canvas": { "width": 640, "height": 360 }, "grace_secs": 0.5 }"#)
            .unwrap();
    assert_eq!(cfg.canvas.width, 640);
    assert_eq!(cfg.grace_secs, 0.5);
    assert_eq!(cfg.line_words, 8);
    assert_eq!(cfg.palette, Palette::default());
}

#[test]
fn validation_catches_bad_values() {
    let odd = RenderConfig {
        canvas: Canvas {
            width: 11,
            height: 10,
        },
        ..RenderConfig::default()
    };
    assert!(odd.validate().is_err());

    let zero_words = RenderConfig {
        line_words: 0,
        ..RenderConfig::default()
    };
    assert!(zero_words.validate().is_err());

    let negative_grace = RenderConfig {
        grace_secs: -1.0,
        ..RenderConfig::default()
    };
    assert!(negative_grace.validate().is_err());

    let zero_fps = RenderConfig {
        fps: Fps { num: 0, den: 1 },
        ..RenderConfig::default()
    };
    assert!(zero_fps.validate().is_err());
}

#[test]
fn progress_interval_is_in_frames() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.progress_interval_frames(), 450);
}

#[test]
fn config_file_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{ "line_words": 4 }"#).unwrap();
    let cfg = RenderConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.line_words, 4);

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        RenderConfig::from_json_file(&path),
        Err(LyricError::Serde(_))
    ));
}
