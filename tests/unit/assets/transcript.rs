use super::*;

#[test]
fn parses_transcription_output() {
    let json = r#"[
        { "word": " Hello", "start": 0.5, "end": 0.9, "conf": 0.98 },
        { "word": "world ", "start": 1.0, "end": 1.4 },
        { "text": "again", "start": 1.5, "end": 2.0 }
    ]"#;
    let t = Transcript::from_json_slice(json.as_bytes()).unwrap();
    assert_eq!(t.words.len(), 3);
    assert_eq!(t.words[0].conf, Some(0.98));
    assert_eq!(t.words[2].word, "again");

    let tl = t.into_timeline().unwrap();
    let texts: Vec<&str> = tl.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, ["Hello", "world", "again"]);
}

#[test]
fn blank_words_are_dropped() {
    let json = r#"[
        { "word": "a", "start": 0.0, "end": 0.1 },
        { "word": "   ", "start": 0.1, "end": 0.2 },
        { "word": "b", "start": 0.2, "end": 0.3 }
    ]"#;
    let tl = Transcript::from_json_slice(json.as_bytes())
        .unwrap()
        .into_timeline()
        .unwrap();
    assert_eq!(tl.len(), 2);
    assert_eq!(tl.get(1).unwrap().text, "b");
}

#[test]
fn null_list_is_malformed_and_empty_list_is_not() {
    assert!(matches!(
        Transcript::from_json_slice(b"null"),
        Err(LyricError::MalformedInput(_))
    ));
    let tl = Transcript::from_json_slice(b"[]")
        .unwrap()
        .into_timeline()
        .unwrap();
    assert!(tl.is_empty());
}

#[test]
fn inverted_interval_is_malformed() {
    let json = r#"[{ "word": "x", "start": 2.0, "end": 1.0 }]"#;
    let err = Transcript::from_json_slice(json.as_bytes())
        .unwrap()
        .into_timeline()
        .unwrap_err();
    assert!(matches!(err, LyricError::MalformedInput(_)));
}

#[test]
fn garbage_is_a_serde_error() {
    assert!(matches!(
        Transcript::from_json_slice(b"{\"words\": 3}"),
        Err(LyricError::Serde(_))
    ));
}

#[test]
fn load_timeline_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.json");
    std::fs::write(&path, r#"[{ "word": "la", "start": 0.0, "end": 0.5 }]"#).unwrap();
    let tl = load_timeline(&path).unwrap();
    assert_eq!(tl.len(), 1);

    assert!(load_timeline(&dir.path().join("missing.json")).is_err());
}
