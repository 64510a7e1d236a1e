use std::collections::BTreeMap;

use {async_trait::async_trait, tokio::sync::RwLock, tracing::debug};

use switchboard_protocol::{ChatMessage, RelayError};

use crate::MessageStore;

// ── In-memory message log ────────────────────────────────────────────────────

/// Process-local [`MessageStore`] over a `BTreeMap` so that range scans per
/// thread come back in timestamp order.
///
/// A put on an existing `(thread_id, timestamp)` key overwrites, matching
/// keyed-store semantics; the relay supplies the unique `messageId`, not
/// key uniqueness.
#[derive(Default)]
pub struct MemoryMessageStore {
    log: RwLock<BTreeMap<(String, i64), ChatMessage>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records, expired ones included (reclamation is lazy).
    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.log.read().await.is_empty()
    }

    fn now_unix() -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn put(&self, message: ChatMessage) -> Result<(), RelayError> {
        debug!(
            message_id = %message.message_id,
            thread_id = %message.thread_id,
            timestamp = message.timestamp,
            "message put"
        );
        self.log
            .write()
            .await
            .insert((message.thread_id.clone(), message.timestamp), message);
        Ok(())
    }

    async fn history(
        &self,
        thread_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RelayError> {
        let now = Self::now_unix();
        let log = self.log.read().await;
        let range = (thread_id.to_string(), i64::MIN)..=(thread_id.to_string(), i64::MAX);
        let mut out: Vec<ChatMessage> = log
            .range(range)
            .map(|(_, m)| m)
            .filter(|m| m.expires_at > now)
            .cloned()
            .collect();
        if out.len() > limit {
            // Keep the newest `limit` entries.
            out.drain(..out.len() - limit);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use switchboard_protocol::{MessageStatus, MessageType};

    use super::*;

    fn message(thread: &str, ts: i64, expires_at: i64) -> ChatMessage {
        ChatMessage {
            message_id: format!("m-{ts}"),
            thread_id: thread.into(),
            message_type: MessageType::User,
            text: "hello".into(),
            sender: "u1".into(),
            timestamp: ts,
            status: MessageStatus::Sent,
            metadata: serde_json::Map::new(),
            expires_at,
        }
    }

    fn far_future() -> i64 {
        chrono::Utc::now().timestamp() + 86_400
    }

    #[tokio::test]
    async fn history_is_timestamp_ordered_per_thread() {
        let store = MemoryMessageStore::new();
        let exp = far_future();
        store.put(message("t1", 30, exp)).await.unwrap();
        store.put(message("t1", 10, exp)).await.unwrap();
        store.put(message("t2", 20, exp)).await.unwrap();
        store.put(message("t1", 20, exp)).await.unwrap();

        let history = store.history("t1", 10).await.unwrap();
        let stamps: Vec<i64> = history.iter().map(|m| m.timestamp).collect();
        assert_eq!(stamps, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn history_respects_limit_keeping_newest() {
        let store = MemoryMessageStore::new();
        let exp = far_future();
        for ts in 1..=5 {
            store.put(message("t1", ts, exp)).await.unwrap();
        }

        let history = store.history("t1", 2).await.unwrap();
        let stamps: Vec<i64> = history.iter().map(|m| m.timestamp).collect();
        assert_eq!(stamps, vec![4, 5]);
    }

    #[tokio::test]
    async fn expired_records_are_invisible() {
        let store = MemoryMessageStore::new();
        let past = chrono::Utc::now().timestamp() - 60;
        store.put(message("t1", 1, past)).await.unwrap();
        store.put(message("t1", 2, far_future())).await.unwrap();

        let history = store.history("t1", 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timestamp, 2);
        // The record itself is still present until reclaimed.
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn unknown_thread_is_empty() {
        let store = MemoryMessageStore::new();
        assert!(store.history("nope", 10).await.unwrap().is_empty());
    }
}
