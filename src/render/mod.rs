//! Frame composition and the frame loop that feeds an encoder.

/// Per-frame composition of background and lyric lines.
pub mod compositor;
/// Rendered frame buffers.
pub mod frame;
/// Placement of a chunk's words on the canvas.
pub mod layout;
/// The frame loop: timeline in, ordered frames out to a sink.
pub mod pipeline;
