use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LyricError::malformed("x")
            .to_string()
            .contains("malformed input:")
    );
    assert!(
        LyricError::duration("x")
            .to_string()
            .contains("duration unavailable:")
    );
    assert!(
        LyricError::encoder("x")
            .to_string()
            .contains("encoder process error:")
    );
    assert!(
        LyricError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LyricError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LyricError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
