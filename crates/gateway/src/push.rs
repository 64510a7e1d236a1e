use std::sync::Arc;

use {async_trait::async_trait, tracing::debug};

use {
    switchboard_channels::{PushChannel, PushError},
    switchboard_protocol::ChatMessage,
};

use crate::state::ClientRegistry;

/// [`PushChannel`] over the gateway's own client registry: the message is
/// serialized and queued on the target session's write loop.
///
/// An unknown connection id, or a write loop that has already shut down,
/// is the `Gone` outcome: the session no longer exists and the caller
/// must reconcile the directory.
pub struct LivePushChannel {
    registry: Arc<ClientRegistry>,
}

impl LivePushChannel {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl PushChannel for LivePushChannel {
    async fn send(&self, connection_id: &str, message: &ChatMessage) -> Result<(), PushError> {
        let frame = serde_json::to_string(message)
            .map_err(|e| PushError::Failed(format!("serialize message: {e}")))?;

        match self.registry.send_to(connection_id, &frame).await {
            Some(true) => {
                debug!(connection_id, message_id = %message.message_id, "pushed to connection");
                Ok(())
            },
            Some(false) | None => Err(PushError::Gone),
        }
    }
}
