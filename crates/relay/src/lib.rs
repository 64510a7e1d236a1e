//! The relay core: connection lifecycle, message ingress, and push
//! delivery against the external directory, store, and channels.
//!
//! Each handler is an independent, stateless unit of work. All state lives
//! in the [`ConnectionDirectory`] and [`MessageStore`]; consistency is
//! delegated to the atomicity of their single-key operations. No handler
//! holds a lock or retries internally — failures are classified into
//! [`RelayError`](switchboard_protocol::RelayError) and reported to the
//! caller.

pub mod delivery;
pub mod ingress;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod testutil;

use std::sync::Arc;

use {
    switchboard_channels::{FanoutChannel, PushChannel},
    switchboard_directory::ConnectionDirectory,
    switchboard_messages::MessageStore,
};

pub use {delivery::DeliveryReceipt, ingress::SendReceipt};

/// Relay behavior knobs.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Retention window applied to `expiresAt` on both ingress and push
    /// delivery.
    pub retention_days: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { retention_days: 90 }
    }
}

/// The connection-directory and message-routing subsystem.
pub struct Relay {
    directory: Arc<dyn ConnectionDirectory>,
    messages: Arc<dyn MessageStore>,
    fanout: Arc<dyn FanoutChannel>,
    push: Arc<dyn PushChannel>,
    config: RelayConfig,
}

impl Relay {
    pub fn new(
        directory: Arc<dyn ConnectionDirectory>,
        messages: Arc<dyn MessageStore>,
        fanout: Arc<dyn FanoutChannel>,
        push: Arc<dyn PushChannel>,
        config: RelayConfig,
    ) -> Self {
        Self {
            directory,
            messages,
            fanout,
            push,
            config,
        }
    }

    /// Current time in epoch milliseconds, the unit of `timestamp` and
    /// `lastSeen`.
    pub(crate) fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// `expiresAt` for a message created at `now_ms`, in unix seconds as
    /// the store expects.
    pub(crate) fn expiry_from(&self, now_ms: i64) -> i64 {
        now_ms / 1000 + i64::from(self.config.retention_days) * 86_400
    }
}
