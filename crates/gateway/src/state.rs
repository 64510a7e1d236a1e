use std::{collections::HashMap, sync::Arc};

use tokio::sync::{RwLock, mpsc};

use {
    switchboard_channels::BroadcastFanout,
    switchboard_config::SwitchboardConfig,
    switchboard_directory::MemoryDirectory,
    switchboard_messages::MemoryMessageStore,
    switchboard_relay::{Relay, RelayConfig},
};

use crate::push::LivePushChannel;

// ── Connected client ─────────────────────────────────────────────────────────

/// A WebSocket session currently terminated by this gateway.
#[derive(Debug)]
pub struct ConnectedClient {
    pub connection_id: String,
    pub user_id: String,
    pub thread_id: String,
    /// Channel feeding this client's write loop with serialized frames.
    pub sender: mpsc::UnboundedSender<String>,
}

impl ConnectedClient {
    /// Queue a serialized JSON frame. False when the write loop is gone.
    pub fn send(&self, frame: &str) -> bool {
        self.sender.send(frame.to_string()).is_ok()
    }
}

// ── Client registry ──────────────────────────────────────────────────────────

/// Live transport sessions keyed by connection id. This is transport
/// state, distinct from the Connection Directory: the directory answers
/// "which session does this user route to", the registry answers "is that
/// session physically attached here".
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, ConnectedClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, client: ConnectedClient) {
        let connection_id = client.connection_id.clone();
        self.clients.write().await.insert(connection_id, client);
    }

    pub async fn remove(&self, connection_id: &str) -> Option<ConnectedClient> {
        self.clients.write().await.remove(connection_id)
    }

    pub async fn count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Push a frame to one session. `None` when the session is unknown,
    /// `Some(false)` when its write loop has shut down.
    pub async fn send_to(&self, connection_id: &str, frame: &str) -> Option<bool> {
        let clients = self.clients.read().await;
        clients.get(connection_id).map(|c| c.send(frame))
    }
}

// ── Gateway state ────────────────────────────────────────────────────────────

/// Shared gateway runtime state, wrapped in Arc for use across tasks.
pub struct GatewayState {
    pub registry: Arc<ClientRegistry>,
    pub relay: Arc<Relay>,
    pub fanout: Arc<BroadcastFanout>,
    pub config: SwitchboardConfig,
    pub version: String,
    pub hostname: String,
}

impl GatewayState {
    /// Wire the relay over in-memory components and the live push channel.
    pub fn new(config: SwitchboardConfig) -> Arc<Self> {
        let registry = Arc::new(ClientRegistry::new());
        let fanout = Arc::new(BroadcastFanout::default());
        let relay = Arc::new(Relay::new(
            Arc::new(MemoryDirectory::new()),
            Arc::new(MemoryMessageStore::new()),
            fanout.clone(),
            Arc::new(LivePushChannel::new(Arc::clone(&registry))),
            RelayConfig {
                retention_days: config.relay.retention_days,
            },
        ));

        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".into());

        Arc::new(Self {
            registry,
            relay,
            fanout,
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            hostname,
        })
    }
}
