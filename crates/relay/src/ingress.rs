use {
    serde::{Deserialize, Serialize},
    tracing::{info, warn},
};

use switchboard_protocol::{
    ChatMessage, FanoutEvent, MessageStatus, MessageType, RelayError, RequestMetadata,
    RoutingAttributes, SEND_ACTION, SendEnvelope,
};

use crate::Relay;

/// Acknowledgement returned to the sender on a successful ingress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub message_id: String,
    pub timestamp: i64,
}

impl Relay {
    /// Accept an inbound user message from the session `connection_id`.
    ///
    /// Validation short-circuits in order, each failure with its own
    /// reason: body present and parseable, action tag correct, required
    /// fields non-empty, handle resolvable. On success the message is
    /// persisted, the connection's `lastSeen` is upserted, and, unless a
    /// human operator has taken the thread over, exactly one fan-out
    /// event is published for the responder pool.
    pub async fn send(
        &self,
        connection_id: &str,
        body: Option<&str>,
    ) -> Result<SendReceipt, RelayError> {
        let body = body
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| RelayError::validation("missing message body"))?;
        let envelope: SendEnvelope = serde_json::from_str(body)
            .map_err(|_| RelayError::validation("malformed message body"))?;

        if envelope.action != SEND_ACTION {
            return Err(RelayError::validation("invalid action"));
        }
        if envelope.thread_id.is_empty() || envelope.text.is_empty() || envelope.sender.is_empty() {
            return Err(RelayError::validation(
                "missing required fields: threadId, text, sender",
            ));
        }

        // Resolve who this transport session belongs to.
        let connection = self
            .directory
            .find_by_connection_id(connection_id)
            .await?
            .ok_or_else(|| RelayError::not_found("connection not found"))?;

        let message_id = uuid::Uuid::new_v4().to_string();
        let timestamp = Self::now_ms();
        let message = ChatMessage {
            message_id: message_id.clone(),
            thread_id: envelope.thread_id.clone(),
            message_type: MessageType::User,
            text: envelope.text,
            sender: envelope.sender,
            timestamp,
            status: MessageStatus::Sent,
            metadata: envelope.metadata.unwrap_or_default(),
            expires_at: self.expiry_from(timestamp),
        };

        self.messages.put(message.clone()).await?;

        // Full-record presence upsert, not a partial patch.
        let mut updated = connection.clone();
        updated.last_seen = timestamp;
        self.directory.put(updated).await?;

        if connection.is_human_override {
            // Human is handling this thread; bots must not respond.
            warn!(
                thread_id = %message.thread_id,
                user_id = %connection.user_id,
                "human override active, fan-out suppressed"
            );
        } else {
            let attributes = RoutingAttributes {
                thread_id: message.thread_id.clone(),
                user_id: connection.user_id.clone(),
                message_type: MessageType::User,
            };
            let event = FanoutEvent {
                message: message.clone(),
                // Pre-update snapshot: responders see the connection as it
                // was when the message arrived.
                connection,
                request_metadata: RequestMetadata {
                    connection_id: connection_id.to_string(),
                    user_id: attributes.user_id.clone(),
                    timestamp,
                },
            };
            self.fanout.publish(event, attributes).await?;
            info!(thread_id = %message.thread_id, message_id, "message published to fan-out");
        }

        Ok(SendReceipt {
            message_id,
            timestamp,
        })
    }
}
