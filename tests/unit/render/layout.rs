use super::*;
use crate::timeline::{chunk::build_chunks, word::WordTimeline};

fn three_words() -> WordTimeline {
    WordTimeline::new(vec![
        Word::new("one", 0.0, 1.0),
        Word::new("two", 1.0, 2.0),
        Word::new("three", 2.0, 3.0),
    ])
    .unwrap()
}

#[test]
fn lines_are_centered_and_words_advance_with_trailing_space() {
    let tl = three_words();
    let chunks = build_chunks(&tl, 2).unwrap();
    let cfg = RenderConfig::default();
    let mut text = TextRenderer::builtin(cfg.font.size_px);

    let layout = ChunkLayout::build(&chunks[0], &cfg, &mut text).unwrap();
    assert_eq!(layout.lines.len(), 2);

    // 72px built-in font: 9px cells, 54px per character.
    let top = &layout.lines[0];
    assert_eq!(top.line, 0);
    assert_eq!(top.width, 7.0 * 54.0);
    assert_eq!(top.words.len(), 2);
    assert_eq!(top.words[0].origin, kurbo::Point::new(771.0, 449.0));
    assert_eq!(top.words[1].origin, kurbo::Point::new(771.0 + 4.0 * 54.0, 449.0));
    assert_eq!(top.words[0].shaped.width(), 4.0 * 54.0);

    let bottom = &layout.lines[1];
    assert_eq!(bottom.line, 1);
    assert_eq!(bottom.words.len(), 1);
    assert_eq!(bottom.words[0].chunk_word, 2);
    assert_eq!(bottom.words[0].origin, kurbo::Point::new(825.0, 559.0));
}

#[test]
fn short_chunk_has_only_the_top_line() {
    let tl = three_words();
    let chunks = build_chunks(&tl, 8).unwrap();
    let cfg = RenderConfig::default();
    let mut text = TextRenderer::builtin(cfg.font.size_px);

    let layout = ChunkLayout::build(&chunks[0], &cfg, &mut text).unwrap();
    assert_eq!(layout.lines.len(), 1);
    assert_eq!(layout.lines[0].line, 0);
    assert_eq!(layout.lines[0].words.len(), 3);
    let indices: Vec<usize> = layout.lines[0].words.iter().map(|w| w.chunk_word).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn overlong_line_starts_left_of_the_canvas() {
    let words: Vec<Word> = (0..4)
        .map(|i| Word::new("abcdefghij", f64::from(i), f64::from(i) + 0.5))
        .collect();
    let tl = WordTimeline::new(words).unwrap();
    let chunks = build_chunks(&tl, 4).unwrap();
    let cfg = RenderConfig::default();
    let mut text = TextRenderer::builtin(cfg.font.size_px);

    let layout = ChunkLayout::build(&chunks[0], &cfg, &mut text).unwrap();
    assert!(layout.lines[0].width > cfg.canvas.width as f32);
    assert!(layout.lines[0].words[0].origin.x < 0.0);
}
