//! HTTP and WebSocket status server.
//!
//! Two routes:
//!
//! - `GET /drip-rate` — current formatted status, computed on demand.
//! - `GET /ws` — WebSocket upgrade; the connection registers with the
//!   broadcast hub and forwards every status push until the client goes
//!   away.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::Result;
use crate::hub::BroadcastHub;
use crate::monitor::MonitorState;

/// Shared server state.
#[derive(Clone)]
pub struct ServerState {
    pub monitor: Arc<MonitorState>,
    pub hub: Arc<BroadcastHub>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    message: String,
}

/// Build the router with CORS and request tracing applied.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/drip-rate", get(drip_rate))
        .route("/ws", get(ws_upgrade))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process shuts down.
pub async fn serve(state: ServerState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "status server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn drip_rate(State(state): State<ServerState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: state.monitor.status_message(),
    })
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: ServerState) {
    let (mut sender, mut receiver) = socket.split();
    let (id, mut rx) = state.hub.register();
    debug!(observer = %id, "websocket observer connected");

    loop {
        tokio::select! {
            push = rx.recv() => {
                match push {
                    Some(text) => {
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                }
            }
        }
    }

    state.hub.remove(id);
    debug!(observer = %id, "websocket observer disconnected");
}
