use crate::{foundation::core::Rgb8, timeline::word::Word};

/// Display state of one word at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordState {
    /// Not sung yet (`t < start`).
    Future,
    /// Being sung (`start <= t <= end`).
    Active,
    /// Already sung (`t > end`).
    Past,
}

/// Resolve the display state of `word` at time `t`.
///
/// Both interval ends are inclusive, so a zero-length word is `Active` exactly at its timestamp.
pub fn resolve(word: &Word, t: f64) -> WordState {
    if t > word.end {
        WordState::Past
    } else if t >= word.start {
        WordState::Active
    } else {
        WordState::Future
    }
}

/// Colors for each [`WordState`] plus the frame background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Upcoming words.
    pub future: Rgb8,
    /// The word being sung.
    pub active: Rgb8,
    /// Words already sung.
    pub past: Rgb8,
    /// Frame background.
    pub background: Rgb8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            future: Rgb8::new(255, 255, 255),
            active: Rgb8::new(255, 220, 0),
            past: Rgb8::new(80, 80, 80),
            background: Rgb8::new(0, 0, 0),
        }
    }
}

impl Palette {
    /// Color used to draw a word in `state`.
    pub fn color_for(&self, state: WordState) -> Rgb8 {
        match state {
            WordState::Future => self.future,
            WordState::Active => self.active,
            WordState::Past => self.past,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/color.rs"]
mod tests;
