use crate::{
    foundation::error::{LyricError, LyricResult},
    timeline::word::{Word, WordTimeline},
};

/// Default number of words per display line.
pub const DEFAULT_LINE_WORDS: usize = 8;

/// Default seconds a chunk stays on screen after its last word ends.
pub const DEFAULT_GRACE_SECS: f64 = 2.0;

/// Contiguous group of up to `2 * line_words` words shown together as two lines.
///
/// Borrows from the [`WordTimeline`] it was built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chunk<'a> {
    index: usize,
    first_word: usize,
    line_words: usize,
    words: &'a [Word],
}

impl<'a> Chunk<'a> {
    /// Position of this chunk in chunk order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Timeline index of the chunk's first word.
    pub fn first_word_index(&self) -> usize {
        self.first_word
    }

    /// Words per display line this chunk was built with.
    pub fn line_words(&self) -> usize {
        self.line_words
    }

    /// Words in timeline order. Never empty.
    pub fn words(&self) -> &'a [Word] {
        self.words
    }

    /// The two display lines. The second is empty when the chunk holds `line_words` or fewer.
    pub fn lines(&self) -> [&'a [Word]; 2] {
        let split = self.line_words.min(self.words.len());
        let (top, bottom) = self.words.split_at(split);
        [top, bottom]
    }

    /// Start of the first word.
    pub fn start(&self) -> f64 {
        self.words[0].start
    }

    /// End of the last word, before grace.
    pub fn end(&self) -> f64 {
        self.words[self.words.len() - 1].end
    }

    /// Visible window `[first.start, last.end + grace]`.
    pub fn window(&self, grace_secs: f64) -> (f64, f64) {
        (self.start(), self.end() + grace_secs)
    }

    /// Return `true` when `t` lies inside the visible window (inclusive on both ends).
    pub fn is_visible_at(&self, t: f64, grace_secs: f64) -> bool {
        let (lo, hi) = self.window(grace_secs);
        lo <= t && t <= hi
    }
}

/// Partition `timeline` into chunks of `2 * line_words` words, in order.
///
/// Grouping is by count only; the last chunk may be short. An empty timeline yields no chunks.
pub fn build_chunks(timeline: &WordTimeline, line_words: usize) -> LyricResult<Vec<Chunk<'_>>> {
    if line_words == 0 {
        return Err(LyricError::validation("line_words must be >= 1"));
    }

    let per_chunk = line_words * 2;
    Ok(timeline
        .as_slice()
        .chunks(per_chunk)
        .enumerate()
        .map(|(index, words)| Chunk {
            index,
            first_word: index * per_chunk,
            line_words,
            words,
        })
        .collect())
}

/// First chunk (in chunk order) whose visible window contains `t`.
///
/// When grace windows overlap the next chunk's start, the earlier chunk wins.
pub fn active_chunk<'c, 'a>(
    chunks: &'c [Chunk<'a>],
    t: f64,
    grace_secs: f64,
) -> Option<&'c Chunk<'a>> {
    chunks.iter().find(|c| c.is_visible_at(t, grace_secs))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/chunk.rs"]
mod tests;
