use serde::{Deserialize, Serialize};

// ── Messages ─────────────────────────────────────────────────────────────────

/// Author category of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Bot,
    System,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::System => "system",
        }
    }
}

/// Delivery status recorded at creation. Status never changes after a
/// message has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

/// One unit of conversation, keyed by `(threadId, timestamp)` in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message_id: String,
    pub thread_id: String,
    pub message_type: MessageType,
    pub text: String,
    pub sender: String,
    /// Creation time, epoch milliseconds. Ordering key within a thread.
    pub timestamp: i64,
    pub status: MessageStatus,
    /// Open key-value mapping, opaque to the relay.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Unix seconds after which the store may reclaim the record.
    pub expires_at: i64,
}

// ── Connections ──────────────────────────────────────────────────────────────

/// One reachable user: the directory entry mapping a user identity to its
/// single current live transport session. At most one record per `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub user_id: String,
    /// Opaque handle of the live transport session.
    pub connection_id: String,
    /// Conversation this connection is currently bound to.
    pub thread_id: String,
    /// Epoch milliseconds, monotonically non-decreasing per record.
    pub last_seen: i64,
    /// When true, bot fan-out is suppressed for this user's thread.
    pub is_human_override: bool,
}

// ── Fan-out ──────────────────────────────────────────────────────────────────

/// Context of the ingress request that produced a fan-out event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub connection_id: String,
    pub user_id: String,
    pub timestamp: i64,
}

/// Snapshot broadcast to responder subscribers. In-flight only, never
/// stored. The `connection` is the pre-update snapshot taken when the
/// triggering message arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanoutEvent {
    pub message: ChatMessage,
    pub connection: Connection,
    pub request_metadata: RequestMetadata,
}

/// Attributes attached to a published fan-out event for subscriber-side
/// filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingAttributes {
    pub thread_id: String,
    pub user_id: String,
    pub message_type: MessageType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_wire_names_are_camel_case() {
        let msg = ChatMessage {
            message_id: "m1".into(),
            thread_id: "t1".into(),
            message_type: MessageType::User,
            text: "hi".into(),
            sender: "u1".into(),
            timestamp: 1_700_000_000_000,
            status: MessageStatus::Sent,
            metadata: serde_json::Map::new(),
            expires_at: 1_707_776_000,
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["messageId"], "m1");
        assert_eq!(v["messageType"], "user");
        assert_eq!(v["expiresAt"], 1_707_776_000);
        assert_eq!(v["status"], "sent");
    }

    #[test]
    fn connection_override_flag_wire_name() {
        let conn = Connection {
            user_id: "u1".into(),
            connection_id: "c1".into(),
            thread_id: "t1".into(),
            last_seen: 0,
            is_human_override: true,
        };
        let v = serde_json::to_value(&conn).unwrap();
        assert_eq!(v["isHumanOverride"], true);
        assert_eq!(v["connectionId"], "c1");
    }

    #[test]
    fn message_roundtrips_with_metadata() {
        let raw = serde_json::json!({
            "messageId": "m2",
            "threadId": "t9",
            "messageType": "bot",
            "text": "reply",
            "sender": "echo",
            "timestamp": 42,
            "status": "delivered",
            "metadata": { "source": "test" },
            "expiresAt": 99,
        });
        let msg: ChatMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(msg.message_type, MessageType::Bot);
        assert_eq!(msg.metadata["source"], "test");
    }
}
