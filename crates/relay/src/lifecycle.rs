use tracing::{debug, info};

use switchboard_protocol::{Connection, RelayError};

use crate::Relay;

impl Relay {
    /// Handle a new transport session for `user_id` bound to `thread_id`.
    ///
    /// Upserts the directory record with `lastSeen = now` and human
    /// override off. Last connect wins: a reconnect overwrites the prior
    /// record, which implicitly stops routing to the superseded handle.
    pub async fn connect(
        &self,
        connection_id: &str,
        user_id: &str,
        thread_id: &str,
    ) -> Result<(), RelayError> {
        if connection_id.is_empty() {
            return Err(RelayError::validation("missing connection id"));
        }
        if user_id.is_empty() || thread_id.is_empty() {
            return Err(RelayError::validation(
                "missing required parameters: userId and threadId",
            ));
        }

        let record = Connection {
            user_id: user_id.to_string(),
            connection_id: connection_id.to_string(),
            thread_id: thread_id.to_string(),
            last_seen: Self::now_ms(),
            is_human_override: false,
        };
        self.directory.put(record).await?;
        info!(user_id, thread_id, connection_id, "connection stored");
        Ok(())
    }

    /// Handle a closing transport session.
    ///
    /// The closing side only knows its handle, so the owning user is
    /// resolved through the directory's reverse lookup. No match is a
    /// success, not an error: the connection may already have been
    /// replaced by a reconnect, and disconnect must be safe to call
    /// redundantly.
    pub async fn disconnect(&self, connection_id: &str) -> Result<(), RelayError> {
        match self.directory.find_by_connection_id(connection_id).await? {
            Some(record) => {
                self.directory.delete(&record.user_id).await?;
                info!(user_id = %record.user_id, connection_id, "connection removed");
            },
            None => {
                debug!(connection_id, "no connection found for handle, nothing to clean up");
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use switchboard_directory::ConnectionDirectory;

    use crate::testutil::{RecordingPush, harness};

    #[tokio::test]
    async fn connect_stores_a_fresh_record() {
        let h = harness(RecordingPush::accepting());
        h.relay.connect("c1", "u1", "t1").await.unwrap();

        let record = h.directory.get("u1").await.unwrap().unwrap();
        assert_eq!(record.connection_id, "c1");
        assert_eq!(record.thread_id, "t1");
        assert!(!record.is_human_override);
        assert!(record.last_seen > 0);
    }

    #[tokio::test]
    async fn connect_rejects_missing_identity() {
        let h = harness(RecordingPush::accepting());
        let err = h.relay.connect("c1", "", "t1").await.unwrap_err();
        assert_eq!(err.code(), "validation_error");

        let err = h.relay.connect("c1", "u1", "").await.unwrap_err();
        assert_eq!(err.code(), "validation_error");

        let err = h.relay.connect("", "u1", "t1").await.unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[tokio::test]
    async fn reconnect_overwrites_and_old_handle_stops_resolving() {
        let h = harness(RecordingPush::accepting());
        h.relay.connect("c1", "u1", "t1").await.unwrap();
        h.relay.connect("c2", "u1", "t1").await.unwrap();

        let record = h.directory.get("u1").await.unwrap().unwrap();
        assert_eq!(record.connection_id, "c2");
        assert!(
            h.directory
                .find_by_connection_id("c1")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn disconnect_removes_the_record() {
        let h = harness(RecordingPush::accepting());
        h.relay.connect("c1", "u1", "t1").await.unwrap();
        h.relay.disconnect("c1").await.unwrap();

        assert!(h.directory.get("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disconnect_of_unknown_handle_is_idempotent_success() {
        let h = harness(RecordingPush::accepting());
        h.relay.disconnect("never-connected").await.unwrap();
        // And again, redundantly.
        h.relay.disconnect("never-connected").await.unwrap();
    }

    #[tokio::test]
    async fn stale_disconnect_after_reconnect_keeps_current_session() {
        let h = harness(RecordingPush::accepting());
        h.relay.connect("c1", "u1", "t1").await.unwrap();
        h.relay.connect("c2", "u1", "t1").await.unwrap();

        // The superseded session's disconnect arrives late.
        h.relay.disconnect("c1").await.unwrap();

        let record = h.directory.get("u1").await.unwrap().unwrap();
        assert_eq!(record.connection_id, "c2");
    }
}
