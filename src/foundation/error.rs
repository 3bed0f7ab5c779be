/// Convenience result type used across the crate.
pub type GridResult<T> = Result<T, GraphPaperError>;

/// Top-level error taxonomy used by the composer, resampler and option layer.
#[derive(thiserror::Error, Debug)]
pub enum GraphPaperError {
    /// Grid configuration rejected before any pixels were produced.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid caller-provided buffers or rectangles.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing option data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GraphPaperError {
    /// Build a [`GraphPaperError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`GraphPaperError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GraphPaperError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors raised by configuration checks.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
