use {async_trait::async_trait, thiserror::Error};

use switchboard_protocol::ChatMessage;

/// Failure of a targeted push.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    /// The canonical signal that the target session no longer exists.
    /// Callers must reconcile the directory on this outcome.
    #[error("connection no longer exists")]
    Gone,

    /// Any other, possibly transient, delivery failure.
    #[error("push failed: {0}")]
    Failed(String),
}

/// Targeted delivery to one live transport session.
#[async_trait]
pub trait PushChannel: Send + Sync {
    async fn send(&self, connection_id: &str, message: &ChatMessage) -> Result<(), PushError>;
}
