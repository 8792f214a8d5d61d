//! Text measurement and drawing for lyric words.
//!
//! Outline fonts are shaped with `parley` and filled with `vello_cpu`; the built-in bitmap font is
//! filled as pixel-aligned cells so it renders without any font file.

pub(crate) mod builtin;
/// Shaping and drawing of single words and lines.
pub mod renderer;
