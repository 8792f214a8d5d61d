use super::*;

#[test]
fn accepts_ordered_words_and_ties() {
    let tl = WordTimeline::new(vec![
        Word::new("a", 0.0, 0.5),
        Word::new("b", 0.5, 0.5),
        Word::new("c", 0.5, 1.0),
    ])
    .unwrap();
    assert_eq!(tl.len(), 3);
    assert_eq!(tl.get(1).unwrap().text, "b");
    assert_eq!(tl.get(1).unwrap().duration_secs(), 0.0);
    assert!(tl.get(3).is_none());
    let texts: Vec<&str> = tl.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, ["a", "b", "c"]);
}

#[test]
fn start_after_end_is_malformed() {
    let err = WordTimeline::new(vec![Word::new("ok", 0.0, 1.0), Word::new("bad", 2.0, 1.5)])
        .unwrap_err();
    assert!(matches!(err, LyricError::MalformedInput(_)));
    assert!(err.to_string().contains("bad"));
}

#[test]
fn non_finite_bounds_are_malformed() {
    let err = WordTimeline::new(vec![Word::new("nan", f64::NAN, 1.0)]).unwrap_err();
    assert!(matches!(err, LyricError::MalformedInput(_)));

    let err = WordTimeline::new(vec![Word::new("inf", 0.0, f64::INFINITY)]).unwrap_err();
    assert!(matches!(err, LyricError::MalformedInput(_)));
}

#[test]
fn missing_list_is_malformed_but_empty_list_is_fine() {
    let err = WordTimeline::from_triples::<&str>(None).unwrap_err();
    assert!(matches!(err, LyricError::MalformedInput(_)));

    let tl = WordTimeline::from_triples::<&str>(Some(vec![])).unwrap();
    assert!(tl.is_empty());
    assert_eq!(tl, WordTimeline::empty());
}

#[test]
fn unordered_starts_are_kept_as_given() {
    let tl = WordTimeline::from_triples(Some(vec![("late", 3.0, 4.0), ("early", 1.0, 2.0)]))
        .unwrap();
    assert_eq!(tl.get(0).unwrap().text, "late");
    assert_eq!(tl.get(1).unwrap().text, "early");
}
