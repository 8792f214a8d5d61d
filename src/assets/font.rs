use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::config::FontConfig;

/// Bold sans faces commonly present on Linux images, tried before the system font database.
pub const WELL_KNOWN_BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
];

/// A non-fatal font problem. Rendering continues with the next fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontWarning {
    /// Human-readable cause.
    pub message: String,
}

impl std::fmt::Display for FontWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "font unavailable: {}", self.message)
    }
}

/// Where the resolved font came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// The file named in [`FontConfig::path`].
    Configured(PathBuf),
    /// One of [`WELL_KNOWN_BOLD_FONTS`].
    WellKnown(PathBuf),
    /// A face picked from the system font database.
    System(String),
    /// The built-in bitmap font.
    Builtin,
}

/// Font data ready to hand to the text renderer. Cheap to clone and shareable across threads.
#[derive(Clone)]
pub enum FontSource {
    /// Outline font bytes (TTF/OTF/TTC) and the face index inside them.
    Outline {
        /// Raw font file bytes.
        bytes: Arc<Vec<u8>>,
        /// Face index within a collection, 0 for single-face files.
        index: u32,
        /// Primary family name.
        family: String,
    },
    /// The built-in bitmap font; always available.
    Builtin,
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline {
                bytes,
                index,
                family,
            } => f
                .debug_struct("Outline")
                .field("bytes_len", &bytes.len())
                .field("index", index)
                .field("family", family)
                .finish(),
            Self::Builtin => f.write_str("Builtin"),
        }
    }
}

/// Result of font resolution: the font to use plus every fallback that was taken.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Font data.
    pub source: FontSource,
    /// Provenance, for diagnostics.
    pub origin: FontOrigin,
    /// Problems met on the way, in the order they happened.
    pub warnings: Vec<FontWarning>,
}

impl ResolvedFont {
    /// The built-in font with no warnings.
    pub fn builtin() -> Self {
        Self {
            source: FontSource::Builtin,
            origin: FontOrigin::Builtin,
            warnings: Vec::new(),
        }
    }
}

/// Resolve the lyric font without ever failing.
///
/// Order: configured path, then (when `system_fallback`) the well-known bold fonts and the system
/// database, then the built-in bitmap font. Each miss becomes a [`FontWarning`].
pub fn resolve_font(cfg: &FontConfig) -> ResolvedFont {
    let mut warnings = Vec::new();

    if let Some(path) = cfg.path.as_deref() {
        match load_font_file(path) {
            Ok(source) => {
                return ResolvedFont {
                    source,
                    origin: FontOrigin::Configured(path.to_path_buf()),
                    warnings,
                };
            }
            Err(message) => push_warning(&mut warnings, message),
        }
    }

    if cfg.system_fallback {
        for candidate in WELL_KNOWN_BOLD_FONTS {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            match load_font_file(path) {
                Ok(source) => {
                    return ResolvedFont {
                        source,
                        origin: FontOrigin::WellKnown(path.to_path_buf()),
                        warnings,
                    };
                }
                Err(message) => push_warning(&mut warnings, message),
            }
        }

        if let Some(source) = query_system_bold_sans() {
            let family = match &source {
                FontSource::Outline { family, .. } => family.clone(),
                FontSource::Builtin => String::new(),
            };
            return ResolvedFont {
                source,
                origin: FontOrigin::System(family),
                warnings,
            };
        }
        push_warning(
            &mut warnings,
            "no bold sans-serif face found in the system font database".to_string(),
        );
    }

    push_warning(&mut warnings, "using the built-in bitmap font".to_string());
    ResolvedFont {
        source: FontSource::Builtin,
        origin: FontOrigin::Builtin,
        warnings,
    }
}

fn push_warning(warnings: &mut Vec<FontWarning>, message: String) {
    let w = FontWarning { message };
    tracing::warn!("{w}");
    warnings.push(w);
}

fn load_font_file(path: &Path) -> Result<FontSource, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    font_source_from_bytes(bytes, 0)
        .ok_or_else(|| format!("'{}' contains no usable font face", path.display()))
}

/// Wrap raw font bytes, checking that face `index` parses and has a family name.
pub fn font_source_from_bytes(bytes: Vec<u8>, index: u32) -> Option<FontSource> {
    let mut db = usvg::fontdb::Database::new();
    db.load_font_data(bytes.clone());
    let face = db.faces().find(|f| f.index == index)?;
    let family = face.families.first().map(|(name, _)| name.clone())?;
    Some(FontSource::Outline {
        bytes: Arc::new(bytes),
        index,
        family,
    })
}

fn query_system_bold_sans() -> Option<FontSource> {
    use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

    let mut db = Database::new();
    db.load_system_fonts();

    let families = [
        Family::Name("DejaVu Sans"),
        Family::Name("Liberation Sans"),
        Family::SansSerif,
    ];
    let id = db.query(&Query {
        families: &families,
        weight: Weight::BOLD,
        stretch: Stretch::Normal,
        style: Style::Normal,
    })?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    font_source_from_bytes(bytes, index)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
