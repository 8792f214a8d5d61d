use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::core::{Canvas, Fps},
    foundation::error::{LyricError, LyricResult},
    timeline::chunk::{DEFAULT_GRACE_SECS, DEFAULT_LINE_WORDS},
    timeline::color::Palette,
};

/// Font selection for lyric text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Preferred TTF/OTF file. Unreadable files fall back without failing the job.
    pub path: Option<PathBuf>,
    /// Nominal font size in pixels.
    pub size_px: f32,
    /// Search well-known bold sans fonts and the system font database before the built-in font.
    pub system_fallback: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size_px: 72.0,
            system_fallback: true,
        }
    }
}

/// Immutable configuration for one rendering job.
///
/// Loaded from JSON where every field is optional; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Words per display line; a chunk holds two lines.
    pub line_words: usize,
    /// Seconds a chunk lingers after its last word ends.
    pub grace_secs: f64,
    /// Lyric font.
    pub font: FontConfig,
    /// Distance between the two line tops, in pixels.
    pub line_spacing_px: f32,
    /// Word state colors and background.
    pub palette: Palette,
    /// Seconds of output between progress notifications.
    pub progress_interval_secs: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            line_words: DEFAULT_LINE_WORDS,
            grace_secs: DEFAULT_GRACE_SECS,
            font: FontConfig::default(),
            line_spacing_px: 110.0,
            palette: Palette::default(),
            progress_interval_secs: 15.0,
        }
    }
}

impl RenderConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> LyricResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes).map_err(|e| {
            LyricError::serde(format!("parse render config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field for values the renderer or encoder cannot honor.
    pub fn validate(&self) -> LyricResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(LyricError::validation("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(LyricError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(LyricError::validation("canvas width/height exceed 65535"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.line_words == 0 {
            return Err(LyricError::validation("line_words must be >= 1"));
        }
        if !self.grace_secs.is_finite() || self.grace_secs < 0.0 {
            return Err(LyricError::validation("grace_secs must be finite and >= 0"));
        }
        if !self.font.size_px.is_finite() || self.font.size_px <= 0.0 {
            return Err(LyricError::validation("font size_px must be finite and > 0"));
        }
        if !self.line_spacing_px.is_finite() {
            return Err(LyricError::validation("line_spacing_px must be finite"));
        }
        if !self.progress_interval_secs.is_finite() || self.progress_interval_secs <= 0.0 {
            return Err(LyricError::validation("progress_interval_secs must be finite and > 0"));
        }
        Ok(())
    }

    /// Top edge of display line `line` (0 or 1), centered as a pair around the canvas middle.
    pub fn line_top_px(&self, line: usize) -> f32 {
        let mid = (self.canvas.height / 2) as f32;
        let half_gap = self.line_spacing_px / 2.0;
        let half_glyph = self.font.size_px / 2.0;
        if line == 0 {
            mid - half_gap - half_glyph
        } else {
            mid + half_gap - half_glyph
        }
    }

    /// Frames between progress notifications, at least one.
    pub fn progress_interval_frames(&self) -> u64 {
        self.fps.secs_to_frames_ceil(self.progress_interval_secs).max(1)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
