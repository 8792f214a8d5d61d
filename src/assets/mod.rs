//! Front-loaded job inputs: transcript, font, and audio duration.
//!
//! Everything that touches the filesystem or an external tool before the frame loop lives here, so
//! the renderer itself stays IO-free.

/// Font discovery with non-fatal fallback.
pub mod font;
/// Audio duration probing.
pub mod media;
/// `words.json` transcript loading.
pub mod transcript;
