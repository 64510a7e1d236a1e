use std::collections::HashMap;

use {async_trait::async_trait, tokio::sync::RwLock, tracing::debug};

use switchboard_protocol::{Connection, RelayError};

use crate::ConnectionDirectory;

// ── In-memory directory ──────────────────────────────────────────────────────

#[derive(Default)]
struct DirectoryInner {
    /// Primary map, keyed by user id.
    by_user: HashMap<String, Connection>,
    /// Secondary index: connection id → user id. Updated under the same
    /// lock as `by_user` so the two never diverge.
    by_connection: HashMap<String, String>,
}

/// Process-local [`ConnectionDirectory`] backed by a pair of hash maps
/// under one `RwLock`.
#[derive(Default)]
pub struct MemoryDirectory {
    inner: RwLock<DirectoryInner>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_user.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_user.is_empty()
    }
}

#[async_trait]
impl ConnectionDirectory for MemoryDirectory {
    async fn put(&self, record: Connection) -> Result<(), RelayError> {
        let mut inner = self.inner.write().await;
        // A reconnect replaces the prior record; drop its index entry so
        // the superseded handle stops resolving.
        let prior_handle = inner
            .by_user
            .get(&record.user_id)
            .map(|old| old.connection_id.clone());
        if let Some(old_id) = prior_handle {
            if old_id != record.connection_id {
                inner.by_connection.remove(&old_id);
            }
        }
        inner
            .by_connection
            .insert(record.connection_id.clone(), record.user_id.clone());
        debug!(user_id = %record.user_id, connection_id = %record.connection_id, "directory put");
        inner.by_user.insert(record.user_id.clone(), record);
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Option<Connection>, RelayError> {
        Ok(self.inner.read().await.by_user.get(user_id).cloned())
    }

    async fn delete(&self, user_id: &str) -> Result<Option<Connection>, RelayError> {
        let mut inner = self.inner.write().await;
        let removed = inner.by_user.remove(user_id);
        if let Some(record) = &removed {
            inner.by_connection.remove(&record.connection_id);
            debug!(user_id, connection_id = %record.connection_id, "directory delete");
        }
        Ok(removed)
    }

    async fn find_by_connection_id(
        &self,
        connection_id: &str,
    ) -> Result<Option<Connection>, RelayError> {
        let inner = self.inner.read().await;
        let Some(user_id) = inner.by_connection.get(connection_id) else {
            return Ok(None);
        };
        Ok(inner.by_user.get(user_id).cloned())
    }
}
