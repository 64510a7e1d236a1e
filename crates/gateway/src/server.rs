use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Json, Router,
        extract::{Query, State, WebSocketUpgrade, rejection::JsonRejection},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::info,
};

use {
    switchboard_config::SwitchboardConfig,
    switchboard_protocol::{DeliverRequest, RelayError},
};

use crate::{
    responder::run_echo_responder,
    state::GatewayState,
    ws::{ConnectQuery, handle_connection},
};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct AppState {
    gateway: Arc<GatewayState>,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_upgrade_handler))
        .route("/deliver", post(deliver_handler))
        .layer(cors)
        .with_state(AppState { gateway: state })
}

/// Build the full runtime state from config and spawn the optional echo
/// responder.
pub fn build_gateway_state(config: SwitchboardConfig) -> Arc<GatewayState> {
    let state = GatewayState::new(config);

    if state.config.responder.enabled {
        let subscriber = state.fanout.subscribe();
        let relay = Arc::clone(&state.relay);
        let sender = state.config.responder.sender.clone();
        tokio::spawn(run_echo_responder(subscriber, relay, sender));
    }

    state
}

/// Start the gateway HTTP + WebSocket server.
pub async fn start_gateway(config: SwitchboardConfig) -> anyhow::Result<()> {
    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;
    let state = build_gateway_state(config);
    let app = build_gateway_app(Arc::clone(&state));

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        version = %state.version,
        %addr,
        retention_days = state.config.relay.retention_days,
        responder = state.config.responder.enabled,
        "switchboard gateway listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.gateway.version,
        "hostname": state.gateway.hostname,
        "connections": state.gateway.registry.count().await,
    }))
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state.gateway, query))
}

async fn deliver_handler(
    State(state): State<AppState>,
    request: Result<Json<DeliverRequest>, JsonRejection>,
) -> Response {
    // A body the extractor cannot deserialize is still a caller mistake;
    // it gets the classified validation shape, not a bare 422.
    let Json(request) = match request {
        Ok(json) => json,
        Err(rejection) => {
            return error_response(RelayError::validation(format!(
                "malformed delivery request: {}",
                rejection.body_text()
            )));
        },
    };
    match state.gateway.relay.deliver(request).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Map the relay error taxonomy onto HTTP statuses.
fn error_response(err: RelayError) -> Response {
    let status = match &err {
        RelayError::Validation(_) => StatusCode::BAD_REQUEST,
        RelayError::NotFound(_) => StatusCode::NOT_FOUND,
        RelayError::Gone(_) => StatusCode::GONE,
        RelayError::Delivery(_) => StatusCode::BAD_GATEWAY,
        RelayError::Store(_) | RelayError::Channel(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err.shape())).into_response()
}
