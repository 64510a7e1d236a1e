use std::sync::Arc;

use {
    async_trait::async_trait,
    tokio::sync::broadcast,
    tracing::{debug, warn},
};

use switchboard_protocol::{FanoutEvent, RelayError, RoutingAttributes};

// ── Trait ────────────────────────────────────────────────────────────────────

/// Publish/subscribe bus for fan-out events. Delivery to subscribers is at
/// the channel's discretion; the relay does not track it.
#[async_trait]
pub trait FanoutChannel: Send + Sync {
    async fn publish(
        &self,
        event: FanoutEvent,
        attributes: RoutingAttributes,
    ) -> Result<(), RelayError>;
}

// ── In-process implementation ────────────────────────────────────────────────

/// One published fan-out item: event plus the routing attributes it was
/// tagged with.
#[derive(Debug, Clone)]
pub struct TaggedEvent {
    pub event: Arc<FanoutEvent>,
    pub attributes: RoutingAttributes,
}

/// [`FanoutChannel`] over `tokio::sync::broadcast`. Zero subscribers is
/// not an error; slow subscribers lose the oldest events (at-most-once for
/// laggards, which is within the channel's discretion).
pub struct BroadcastFanout {
    tx: broadcast::Sender<TaggedEvent>,
}

impl BroadcastFanout {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Attach a new independent subscriber. Each subscriber sees every
    /// event published after this call.
    pub fn subscribe(&self) -> FanoutSubscriber {
        FanoutSubscriber {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastFanout {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl FanoutChannel for BroadcastFanout {
    async fn publish(
        &self,
        event: FanoutEvent,
        attributes: RoutingAttributes,
    ) -> Result<(), RelayError> {
        debug!(
            thread_id = %attributes.thread_id,
            user_id = %attributes.user_id,
            message_type = attributes.message_type.as_str(),
            subscribers = self.tx.receiver_count(),
            "fan-out publish"
        );
        // send() only errors when there are no receivers; an empty
        // responder pool drops the event rather than failing the send.
        let _ = self.tx.send(TaggedEvent {
            event: Arc::new(event),
            attributes,
        });
        Ok(())
    }
}

/// Receiving end of the fan-out channel held by one responder.
pub struct FanoutSubscriber {
    rx: broadcast::Receiver<TaggedEvent>,
}

impl FanoutSubscriber {
    /// Next event, skipping over lagged gaps. `None` once the channel is
    /// closed.
    pub async fn recv(&mut self) -> Option<TaggedEvent> {
        loop {
            match self.rx.recv().await {
                Ok(item) => return Some(item),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "fan-out subscriber lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next event whose attributes match `filter`.
    pub async fn recv_filtered(
        &mut self,
        filter: impl Fn(&RoutingAttributes) -> bool,
    ) -> Option<TaggedEvent> {
        loop {
            let item = self.recv().await?;
            if filter(&item.attributes) {
                return Some(item);
            }
        }
    }
}
