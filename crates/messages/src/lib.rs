//! Message Store: append-mostly log of chat messages keyed by
//! `(threadId, timestamp)`.
//!
//! Records carry an `expiresAt` lifecycle timestamp honored by the store
//! itself: expired records become invisible on read and are reclaimed
//! asynchronously. The relay never deletes for expiry.

pub mod memory;

use {async_trait::async_trait, switchboard_protocol::{ChatMessage, RelayError}};

pub use memory::MemoryMessageStore;

/// Ordered log of persisted chat messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message. `(thread_id, timestamp)` is the ordering key;
    /// the store does not deduplicate collisions.
    async fn put(&self, message: ChatMessage) -> Result<(), RelayError>;

    /// Messages of a thread in timestamp order, newest last, capped at
    /// `limit`. Expired records are invisible.
    async fn history(&self, thread_id: &str, limit: usize)
    -> Result<Vec<ChatMessage>, RelayError>;
}
