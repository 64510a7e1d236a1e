use std::sync::Arc;

use tracing::{debug, info, warn};

use {
    switchboard_channels::FanoutSubscriber,
    switchboard_protocol::{DeliverRequest, InboundMessage, MessageStatus, MessageType, RelayError},
    switchboard_relay::Relay,
};

/// Built-in echo responder: a fan-out subscriber that answers every user
/// message in-thread through the regular push delivery path. Stands in
/// the responder-pool slot that bots and humans occupy in production.
pub async fn run_echo_responder(
    mut subscriber: FanoutSubscriber,
    relay: Arc<Relay>,
    sender: String,
) {
    info!(sender, "echo responder started");
    while let Some(item) = subscriber
        .recv_filtered(|attrs| attrs.message_type == MessageType::User)
        .await
    {
        let event = &item.event;
        let request = DeliverRequest {
            user_id: event.connection.user_id.clone(),
            thread_id: event.message.thread_id.clone(),
            message: Some(InboundMessage {
                message_id: None,
                thread_id: event.message.thread_id.clone(),
                message_type: MessageType::Bot,
                text: format!("echo: {}", event.message.text),
                sender: sender.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
                status: MessageStatus::Sent,
                metadata: serde_json::Map::new(),
            }),
        };

        match relay.deliver(request).await {
            Ok(receipt) => {
                debug!(message_id = %receipt.message_id, "echo reply delivered");
            },
            // The user may have disconnected between send and reply;
            // both outcomes just mean nobody is listening anymore.
            Err(RelayError::Gone(_)) | Err(RelayError::NotFound(_)) => {
                debug!(user_id = %event.connection.user_id, "echo target no longer reachable");
            },
            Err(err) => {
                warn!(error = %err, "echo reply failed");
            },
        }
    }
    info!("echo responder stopped");
}
