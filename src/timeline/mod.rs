//! Timed words and the pure decisions made on them per frame.
//!
//! Nothing in this module performs IO; given the same inputs every function returns the same
//! answer, which is what lets the render loop be replayed frame-for-frame.

/// Grouping of words into two-line display chunks.
pub mod chunk;
/// Per-word display state at a query time.
pub mod color;
/// Words and the immutable word timeline.
pub mod word;
