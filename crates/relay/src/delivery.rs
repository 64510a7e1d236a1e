use {
    serde::{Deserialize, Serialize},
    tracing::{info, warn},
};

use {
    switchboard_channels::PushError,
    switchboard_protocol::{ChatMessage, DeliverRequest, RelayError},
};

use crate::Relay;

/// Acknowledgement returned to the responder on a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub message_id: String,
}

impl Relay {
    /// Push a reply (or system message) to the target user's live
    /// connection.
    ///
    /// Delivery outcome drives the only failure-triggered state
    /// reconciliation in the system: success confirms presence and the
    /// message is persisted; a `Gone` signal disproves it, so the
    /// directory entry is removed and the message is NOT persisted (it
    /// was never deliverable). Any other failure is reported as transient
    /// with no directory side effects, leaving retry policy to the
    /// caller.
    pub async fn deliver(&self, request: DeliverRequest) -> Result<DeliveryReceipt, RelayError> {
        if request.user_id.is_empty() || request.thread_id.is_empty() {
            return Err(RelayError::validation(
                "missing required fields: userId, threadId, message",
            ));
        }
        let Some(inbound) = request.message else {
            return Err(RelayError::validation(
                "missing required fields: userId, threadId, message",
            ));
        };

        let connection = self
            .directory
            .get(&request.user_id)
            .await?
            .ok_or_else(|| RelayError::not_found("connection not found for user"))?;

        let message = ChatMessage {
            message_id: inbound
                .message_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            thread_id: inbound.thread_id,
            message_type: inbound.message_type,
            text: inbound.text,
            sender: inbound.sender,
            timestamp: inbound.timestamp,
            status: inbound.status,
            metadata: inbound.metadata,
            expires_at: self.expiry_from(Self::now_ms()),
        };

        match self.push.send(&connection.connection_id, &message).await {
            Ok(()) => {
                self.messages.put(message.clone()).await?;
                info!(
                    user_id = %request.user_id,
                    thread_id = %request.thread_id,
                    message_id = %message.message_id,
                    "message delivered"
                );
                Ok(DeliveryReceipt {
                    message_id: message.message_id,
                })
            },
            Err(PushError::Gone) => {
                // Stop routing to a dead session so future lookups don't
                // retry it. The message is dropped, not persisted.
                warn!(
                    user_id = %request.user_id,
                    connection_id = %connection.connection_id,
                    "stale connection detected, cleaning up"
                );
                self.directory.delete(&request.user_id).await?;
                Err(RelayError::Gone("connection no longer exists".into()))
            },
            Err(PushError::Failed(reason)) => Err(RelayError::Delivery(reason)),
        }
    }
}
