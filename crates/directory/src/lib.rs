//! Connection Directory: the keyed store mapping a user identity to its
//! single current live-connection record.
//!
//! The directory is the sole source of truth for "is this user reachable,
//! and how". Keyed by `user_id`; the reverse lookup needed by disconnect
//! and ingress (`connection_id` → record) is served by a secondary index
//! maintained atomically with the primary map, so no scan and no
//! lookup/mutate race between concurrent connects for the same user.

pub mod memory;

use {async_trait::async_trait, switchboard_protocol::{Connection, RelayError}};

pub use memory::MemoryDirectory;

/// Keyed store of live connections. Single-key operations are atomic per
/// `user_id`; no multi-key transactions are offered or needed.
#[async_trait]
pub trait ConnectionDirectory: Send + Sync {
    /// Full upsert. Overwrites any prior record for the same `user_id`
    /// (last-connect-wins).
    async fn put(&self, record: Connection) -> Result<(), RelayError>;

    /// Direct key lookup.
    async fn get(&self, user_id: &str) -> Result<Option<Connection>, RelayError>;

    /// Delete by key. Returns the removed record, if any.
    async fn delete(&self, user_id: &str) -> Result<Option<Connection>, RelayError>;

    /// Reverse lookup by the non-key connection handle.
    async fn find_by_connection_id(&self, connection_id: &str)
    -> Result<Option<Connection>, RelayError>;
}
