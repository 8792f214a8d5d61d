use crate::foundation::error::{LyricError, LyricResult};

/// One transcribed token with its sung interval in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Word {
    /// Display text.
    pub text: String,
    /// Start of the sung interval, seconds.
    pub start: f64,
    /// End of the sung interval, seconds. Always `>= start` inside a [`WordTimeline`].
    pub end: f64,
}

impl Word {
    /// Build a word. Invariants are checked when the word enters a [`WordTimeline`].
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Length of the sung interval in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

/// Ordered, immutable sequence of words for one job.
///
/// Order is taken as delivered by transcription (non-decreasing `start`); the timeline never
/// re-sorts, and ties are allowed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordTimeline {
    words: Vec<Word>,
}

impl WordTimeline {
    /// Validate and take ownership of `words`.
    ///
    /// Fails with [`LyricError::MalformedInput`] when a bound is not finite or `start > end`.
    pub fn new(words: Vec<Word>) -> LyricResult<Self> {
        for (i, w) in words.iter().enumerate() {
            if !w.start.is_finite() || !w.end.is_finite() {
                return Err(LyricError::malformed(format!(
                    "word {i} ('{}') has a non-finite timestamp",
                    w.text
                )));
            }
            if w.start > w.end {
                return Err(LyricError::malformed(format!(
                    "word {i} ('{}') starts at {} after it ends at {}",
                    w.text, w.start, w.end
                )));
            }
        }

        if let Some(i) = words.windows(2).position(|p| p[1].start < p[0].start) {
            tracing::warn!(
                index = i + 1,
                "word timeline is not ordered by start time; keeping transcription order"
            );
        }

        Ok(Self { words })
    }

    /// Build a timeline from `(text, start, end)` triples.
    ///
    /// `None` stands for a missing word list and is rejected; pass an empty vector for "no lyrics".
    pub fn from_triples<S: Into<String>>(
        triples: Option<Vec<(S, f64, f64)>>,
    ) -> LyricResult<Self> {
        let triples =
            triples.ok_or_else(|| LyricError::malformed("word list is missing (expected a list)"))?;
        Self::new(
            triples
                .into_iter()
                .map(|(text, start, end)| Word::new(text, start, end))
                .collect(),
        )
    }

    /// The empty timeline: every frame is background-only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Return `true` when there are no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    /// Iterate in timeline order.
    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    /// All words in timeline order.
    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }
}

impl<'a> IntoIterator for &'a WordTimeline {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/word.rs"]
mod tests;
