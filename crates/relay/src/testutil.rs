//! Shared fixtures for relay unit tests.

use std::sync::Arc;

use {async_trait::async_trait, tokio::sync::Mutex};

use {
    switchboard_channels::{BroadcastFanout, PushChannel, PushError},
    switchboard_directory::MemoryDirectory,
    switchboard_messages::MemoryMessageStore,
    switchboard_protocol::ChatMessage,
};

use crate::{Relay, RelayConfig};

/// Scripted [`PushChannel`]: records every send and answers with a fixed
/// outcome.
pub(crate) struct RecordingPush {
    outcome: Option<PushError>,
    pub sent: Mutex<Vec<(String, ChatMessage)>>,
}

impl RecordingPush {
    pub fn accepting() -> Self {
        Self {
            outcome: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn gone() -> Self {
        Self {
            outcome: Some(PushError::Gone),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Some(PushError::Failed(reason.into())),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PushChannel for RecordingPush {
    async fn send(&self, connection_id: &str, message: &ChatMessage) -> Result<(), PushError> {
        self.sent
            .lock()
            .await
            .push((connection_id.to_string(), message.clone()));
        match &self.outcome {
            None => Ok(()),
            Some(err) => Err(err.clone()),
        }
    }
}

/// A relay over fresh in-memory components, with handles to each for
/// assertions.
pub(crate) struct Harness {
    pub relay: Relay,
    pub directory: Arc<MemoryDirectory>,
    pub messages: Arc<MemoryMessageStore>,
    pub fanout: Arc<BroadcastFanout>,
    pub push: Arc<RecordingPush>,
}

pub(crate) fn harness(push: RecordingPush) -> Harness {
    let directory = Arc::new(MemoryDirectory::new());
    let messages = Arc::new(MemoryMessageStore::new());
    let fanout = Arc::new(BroadcastFanout::default());
    let push = Arc::new(push);
    let relay = Relay::new(
        directory.clone(),
        messages.clone(),
        fanout.clone(),
        push.clone(),
        RelayConfig::default(),
    );
    Harness {
        relay,
        directory,
        messages,
        fanout,
        push,
    }
}
