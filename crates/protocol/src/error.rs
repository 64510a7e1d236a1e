use {
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

/// Machine-readable error codes reported alongside the human-readable
/// reason.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const NOT_FOUND: &str = "not_found";
    pub const GONE: &str = "gone";
    pub const STORE_ERROR: &str = "store_error";
    pub const CHANNEL_ERROR: &str = "channel_error";
    pub const DELIVERY_ERROR: &str = "delivery_error";
}

/// Classified failure of a relay operation. Every handler converts external
/// failures into one of these before returning; nothing escapes
/// unclassified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Malformed or missing caller input. Reported, never retried.
    #[error("{0}")]
    Validation(String),

    /// Referenced entity absent. Reported, not retried.
    #[error("{0}")]
    NotFound(String),

    /// Target session confirmed dead. Distinguished from a generic
    /// delivery failure so the caller can decide to reroute or drop.
    #[error("{0}")]
    Gone(String),

    /// Directory or message store unavailable.
    #[error("store: {0}")]
    Store(String),

    /// Fan-out channel publish failure.
    #[error("channel: {0}")]
    Channel(String),

    /// Push delivery failed for a reason other than a dead session.
    #[error("delivery: {0}")]
    Delivery(String),
}

impl RelayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => codes::VALIDATION_ERROR,
            Self::NotFound(_) => codes::NOT_FOUND,
            Self::Gone(_) => codes::GONE,
            Self::Store(_) => codes::STORE_ERROR,
            Self::Channel(_) => codes::CHANNEL_ERROR,
            Self::Delivery(_) => codes::DELIVERY_ERROR,
        }
    }

    pub fn shape(&self) -> ErrorShape {
        ErrorShape::new(self.code(), self.to_string())
    }
}

/// Serializable error body returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorShape {
    pub code: String,
    pub message: String,
}

impl ErrorShape {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
