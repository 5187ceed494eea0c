//! WebSocket handler for real-time sample streaming

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket, rejection::WebSocketUpgradeRejection},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use tracing::{debug, info, warn};

use crate::api::{error::ApiResult, state::ApiState, types::StreamEvent};

/// WebSocket upgrade handler
///
/// GET /api/stream
pub async fn websocket_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<ApiState>,
) -> ApiResult<Response> {
    Ok(ws?.on_upgrade(|socket| handle_websocket(socket, state)))
}

/// Handle WebSocket connection
///
/// Each connection owns one hub subscription. A client that cannot keep up
/// only lags itself; the subscription is released when the client leaves.
async fn handle_websocket(socket: WebSocket, state: ApiState) {
    let mut subscription = state.hub.subscribe();
    let subscriber_id = subscription.id();
    info!(
        "WebSocket client {subscriber_id} connected ({} subscribers)",
        state.hub.subscriber_count()
    );

    let (mut sender, mut receiver) = socket.split();

    // Forward samples to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(sample) = subscription.recv().await {
            let text = match serde_json::to_string(&StreamEvent::sample(sample)) {
                Ok(text) => text,
                Err(e) => {
                    warn!("failed to serialize sample: {e}");
                    continue;
                }
            };

            if sender.send(Message::Text(text)).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    // Watch the client side for close frames
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                Message::Ping(_) => {
                    // Pong is automatically sent by axum
                    debug!("received ping");
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    info!("WebSocket client {subscriber_id} disconnected");
}
