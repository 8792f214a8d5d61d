use super::*;

#[test]
fn missing_configured_font_falls_back_to_builtin_with_warnings() {
    let cfg = FontConfig {
        path: Some(PathBuf::from("fonts/does-not-exist.ttf")),
        size_px: 72.0,
        system_fallback: false,
    };
    let resolved = resolve_font(&cfg);
    assert!(matches!(resolved.source, FontSource::Builtin));
    assert_eq!(resolved.origin, FontOrigin::Builtin);
    assert_eq!(resolved.warnings.len(), 2);
    assert!(resolved.warnings[0].message.contains("does-not-exist.ttf"));
    assert!(resolved.warnings[0].to_string().starts_with("font unavailable:"));
}

#[test]
fn non_font_bytes_are_rejected_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.ttf");
    std::fs::write(&path, b"this is not a font").unwrap();

    let cfg = FontConfig {
        path: Some(path),
        size_px: 48.0,
        system_fallback: false,
    };
    let resolved = resolve_font(&cfg);
    assert!(matches!(resolved.source, FontSource::Builtin));
    assert!(resolved.warnings[0].message.contains("no usable font face"));
}

#[test]
fn no_path_and_no_system_fallback_is_builtin() {
    let cfg = FontConfig {
        path: None,
        size_px: 72.0,
        system_fallback: false,
    };
    let resolved = resolve_font(&cfg);
    assert!(matches!(resolved.source, FontSource::Builtin));
    assert_eq!(resolved.warnings.len(), 1);
}

#[test]
fn font_source_from_garbage_is_none() {
    assert!(font_source_from_bytes(vec![0u8; 64], 0).is_none());
}

#[test]
fn system_fallback_never_panics() {
    // Whatever fonts the machine has, resolution yields something usable.
    let resolved = resolve_font(&FontConfig::default());
    match resolved.source {
        FontSource::Outline { bytes, .. } => assert!(!bytes.is_empty()),
        FontSource::Builtin => assert_eq!(resolved.origin, FontOrigin::Builtin),
    }
}
