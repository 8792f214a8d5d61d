use crate::{
    config::RenderConfig,
    foundation::error::LyricResult,
    text::renderer::{ShapedText, TextRenderer},
    timeline::chunk::Chunk,
    timeline::word::Word,
};

/// One word shaped and placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedWord {
    /// Index of the word within its chunk.
    pub chunk_word: usize,
    /// Top-left corner of the word's text box.
    pub origin: kurbo::Point,
    /// Glyphs for the word followed by its trailing space.
    pub shaped: ShapedText,
}

/// A display line: its measured width and the words placed on it.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    /// Which line of the chunk (0 top, 1 bottom).
    pub line: usize,
    /// Width of the words joined with single spaces.
    pub width: f32,
    /// Words left to right.
    pub words: Vec<PlacedWord>,
}

/// Placement of every word of a chunk. Independent of time; only colors change per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkLayout {
    /// Non-empty lines only.
    pub lines: Vec<LineLayout>,
}

impl ChunkLayout {
    /// Measure and place the chunk's lines, each centered horizontally at its fixed height.
    ///
    /// The line width is measured on the space-joined text; the cursor then advances word by word
    /// so color boundaries fall exactly on word boundaries.
    pub fn build(
        chunk: &Chunk<'_>,
        cfg: &RenderConfig,
        text: &mut TextRenderer,
    ) -> LyricResult<Self> {
        let canvas_w = cfg.canvas.width as f32;
        let mut lines = Vec::with_capacity(2);
        let mut chunk_word = 0usize;

        for (line, words) in chunk.lines().into_iter().enumerate() {
            if words.is_empty() {
                continue;
            }

            let width = text.measure(&join_words(words))?;
            let mut x = ((canvas_w - width) / 2.0).floor();
            let y = cfg.line_top_px(line).floor();

            let mut placed = Vec::with_capacity(words.len());
            for w in words {
                let shaped = text.shape(&format!("{} ", w.text))?;
                let advance = shaped.width();
                placed.push(PlacedWord {
                    chunk_word,
                    origin: kurbo::Point::new(f64::from(x), f64::from(y)),
                    shaped,
                });
                x += advance;
                chunk_word += 1;
            }

            lines.push(LineLayout {
                line,
                width,
                words: placed,
            });
        }

        Ok(Self { lines })
    }
}

fn join_words(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
