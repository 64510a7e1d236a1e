use std::sync::Arc;

use {
    axum::extract::ws::{Message, WebSocket},
    futures::{SinkExt, StreamExt},
    serde::Deserialize,
    tokio::sync::mpsc,
    tracing::{debug, info, warn},
};

use crate::state::{ConnectedClient, GatewayState};

/// Identity query parameters of a connection upgrade. Presence is
/// validated by the relay, not here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub thread_id: String,
}

/// Drive one upgraded WebSocket: register the session, route inbound
/// frames to ingress, and tear the session down on close.
pub async fn handle_connection(socket: WebSocket, state: Arc<GatewayState>, query: ConnectQuery) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Directory registration comes first: a session the relay refused
    // (missing identity) is answered with the error and closed.
    if let Err(err) = state
        .relay
        .connect(&connection_id, &query.user_id, &query.thread_id)
        .await
    {
        warn!(connection_id, code = err.code(), "connection rejected");
        let frame = error_frame(err.code(), &err.to_string());
        let _ = ws_tx.send(Message::Text(frame.into())).await;
        let _ = ws_tx.close().await;
        return;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state
        .registry
        .register(ConnectedClient {
            connection_id: connection_id.clone(),
            user_id: query.user_id.clone(),
            thread_id: query.thread_id.clone(),
            sender: tx,
        })
        .await;
    info!(connection_id, user_id = %query.user_id, thread_id = %query.thread_id, "client connected");

    // Write loop: everything queued for this session goes out here.
    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    // Read loop: each text frame is one ingress attempt.
    while let Some(incoming) = ws_rx.next().await {
        match incoming {
            Ok(Message::Text(text)) => {
                let frame = match state.relay.send(&connection_id, Some(text.as_str())).await {
                    Ok(receipt) => serde_json::json!({
                        "type": "receipt",
                        "messageId": receipt.message_id,
                        "timestamp": receipt.timestamp,
                    })
                    .to_string(),
                    Err(err) => error_frame(err.code(), &err.to_string()),
                };
                if state.registry.send_to(&connection_id, &frame).await != Some(true) {
                    break;
                }
            },
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}, // Ping/pong handled by axum; binary ignored.
        }
    }

    // Teardown: drop transport state, then the directory entry.
    state.registry.remove(&connection_id).await;
    if let Err(err) = state.relay.disconnect(&connection_id).await {
        warn!(connection_id, error = %err, "disconnect cleanup failed");
    } else {
        debug!(connection_id, "client disconnected");
    }
    writer.abort();
}

fn error_frame(code: &str, message: &str) -> String {
    serde_json::json!({
        "type": "error",
        "code": code,
        "message": message,
    })
    .to_string()
}
