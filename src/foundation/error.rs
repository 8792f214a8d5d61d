/// Convenience result type used across lyricwipe.
pub type LyricResult<T> = Result<T, LyricError>;

/// Top-level error taxonomy for a rendering job.
///
/// Every variant is terminal for the job that produced it. Font problems are not errors; they are
/// reported as [`FontWarning`](crate::FontWarning) and rendering continues with a fallback.
#[derive(thiserror::Error, Debug)]
pub enum LyricError {
    /// Transcript or timeline data violates its invariants (`start > end`, missing word list).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The audio duration could not be determined, so there is no frame count.
    #[error("duration unavailable: {0}")]
    DurationUnavailable(String),

    /// The encoder failed to start, exited non-zero, or its input pipe broke.
    #[error("encoder process error: {0}")]
    EncoderProcess(String),

    /// Invalid configuration or API usage.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LyricError {
    /// Build a [`LyricError::MalformedInput`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Build a [`LyricError::DurationUnavailable`] value.
    pub fn duration(msg: impl Into<String>) -> Self {
        Self::DurationUnavailable(msg.into())
    }

    /// Build a [`LyricError::EncoderProcess`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::EncoderProcess(msg.into())
    }

    /// Build a [`LyricError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LyricError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
