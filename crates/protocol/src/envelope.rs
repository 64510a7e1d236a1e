use serde::{Deserialize, Serialize};

use crate::types::{MessageStatus, MessageType};

/// Action tag a client must declare on an ingress send.
pub const SEND_ACTION: &str = "message.send";

/// Wire shape of an inbound user message.
///
/// All fields default so that a structurally valid JSON body always parses;
/// the ingress handler validates presence field by field to report distinct
/// reasons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEnvelope {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Wire shape of a push delivery request from a responder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub message: Option<InboundMessage>,
}

/// The embedded message of a push request: a full `ChatMessage` minus
/// `expiresAt` (computed by the relay) with `messageId` optional (assigned
/// by the relay when absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    #[serde(default)]
    pub message_id: Option<String>,
    pub thread_id: String,
    pub message_type: MessageType,
    pub text: String,
    pub sender: String,
    pub timestamp: i64,
    pub status: MessageStatus,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
