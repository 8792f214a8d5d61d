use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{LyricError, LyricResult},
    timeline::word::{Word, WordTimeline},
};

/// One record of the transcription stage's `words.json`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranscriptWord {
    /// Word text (`word` in the file; `text` is accepted too).
    #[serde(alias = "text")]
    pub word: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Recognizer confidence, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<f64>,
}

/// Flat word list produced by the external transcription collaborator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    /// Records in file order.
    pub words: Vec<TranscriptWord>,
}

impl Transcript {
    /// Parse `words.json` bytes. A top-level `null` counts as a missing word list.
    pub fn from_json_slice(bytes: &[u8]) -> LyricResult<Self> {
        let words: Option<Vec<TranscriptWord>> = serde_json::from_slice(bytes)
            .map_err(|e| LyricError::serde(format!("parse transcript JSON: {e}")))?;
        let words =
            words.ok_or_else(|| LyricError::malformed("transcript word list is null"))?;
        Ok(Self { words })
    }

    /// Read and parse a `words.json` file.
    pub fn from_json_file(path: &Path) -> LyricResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read transcript '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    /// Convert into a validated [`WordTimeline`].
    ///
    /// Text is trimmed and records with nothing left to display are dropped.
    pub fn into_timeline(self) -> LyricResult<WordTimeline> {
        let mut words = Vec::with_capacity(self.words.len());
        for (i, rec) in self.words.into_iter().enumerate() {
            let text = rec.word.trim();
            if text.is_empty() {
                tracing::debug!(index = i, "dropping blank transcript word");
                continue;
            }
            words.push(Word::new(text, rec.start, rec.end));
        }
        WordTimeline::new(words)
    }
}

/// Read `path` straight into a [`WordTimeline`].
pub fn load_timeline(path: &Path) -> LyricResult<WordTimeline> {
    Transcript::from_json_file(path)?.into_timeline()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/transcript.rs"]
mod tests;
