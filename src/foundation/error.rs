/// Convenience result type used across scrubline.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only declaration-time problems are errors. Runtime conditions such as a
/// missing element or a collapsed trigger range degrade to "no animation"
/// instead of surfacing here.
#[derive(thiserror::Error, Debug)]
pub enum ScrubError {
    /// Invalid user-provided section, track or manifest data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed layout input (non-finite geometry, bad viewport).
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors while building or validating timeline tracks.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrubError {
    /// Build a [`ScrubError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrubError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`ScrubError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ScrubError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
