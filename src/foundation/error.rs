/// Convenience result type used across cdcard.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the rendering APIs.
///
/// Only fatal conditions are represented here. Missing cover/code images, empty text
/// fields and tracklist overflow are absorbed by the layout and show up in the pixels.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Layout configuration that cannot produce a valid canvas.
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Font resource could not be loaded or registered.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// Encoding the finished canvas failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::ConfigurationInvalid`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigurationInvalid(msg.into())
    }

    /// Build a [`CardError::FontUnavailable`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::FontUnavailable(msg.into())
    }

    /// Build a [`CardError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Whether the error comes from the caller's setup (config or font) rather than IO.
    pub fn is_setup_error(&self) -> bool {
        matches!(self, Self::ConfigurationInvalid(_) | Self::FontUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
