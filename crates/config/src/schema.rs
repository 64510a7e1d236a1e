use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    pub relay: RelaySection,
    pub gateway: GatewaySection,
    pub responder: ResponderSection,
}

/// Relay behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySection {
    /// Retention window in days, applied uniformly to ingress and push
    /// delivery when computing a message's `expiresAt`.
    pub retention_days: u32,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self { retention_days: 90 }
    }
}

/// HTTP/WebSocket listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    pub bind: String,
    pub port: u16,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 18990,
        }
    }
}

/// Built-in echo responder subscribed to the fan-out channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderSection {
    pub enabled: bool,
    /// Sender identity stamped on generated replies.
    pub sender: String,
}

impl Default for ResponderSection {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: "echo-bot".into(),
        }
    }
}
