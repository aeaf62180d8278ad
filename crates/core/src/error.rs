use crate::sticker::StickerId;

/// Result alias that carries the custom [`MirrorError`] type.
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Free-form message, mostly surfaced by external collaborators such as
    /// the style-rating service.
    #[error("{0}")]
    Message(String),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A landmark set did not carry enough points for the model it claims to
    /// come from.
    #[error("{kind} landmarks need {expected} points, got {actual}")]
    InvalidLandmarks {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("timestamp went backwards: {next} ms after {previous} ms")]
    NonMonotonicTimestamp { previous: f64, next: f64 },
    /// Camera or model initialisation failed. Not retried.
    #[error("initialisation failed: {0}")]
    Init(String),
    #[error("unknown asset `{0}`")]
    UnknownAsset(String),
    #[error("unknown sticker {0}")]
    UnknownSticker(StickerId),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl MirrorError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for MirrorError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for MirrorError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
