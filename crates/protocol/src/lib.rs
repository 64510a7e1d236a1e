//! Wire types and error taxonomy shared by every switchboard crate.
//!
//! Field names serialize in camelCase to match the WebSocket/HTTP wire
//! format consumed by clients and responders.

pub mod envelope;
pub mod error;
pub mod types;

pub use {
    envelope::{DeliverRequest, InboundMessage, SEND_ACTION, SendEnvelope},
    error::{ErrorShape, RelayError},
    types::{
        ChatMessage, Connection, FanoutEvent, MessageStatus, MessageType, RequestMetadata,
        RoutingAttributes,
    },
};
