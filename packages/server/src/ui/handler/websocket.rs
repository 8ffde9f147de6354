//! WebSocket entry point: upgrade, register, run the pump pair, clean up.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::StreamExt;
use tokio::{sync::oneshot, time};

use crate::{
    config::ServerConfig,
    infrastructure::{ClientHandle, Hub},
    ui::{
        pump::{inbound_pump, outbound_pump},
        state::AppState,
    },
    usecase::Dispatcher,
};

/// `GET /ws`
///
/// Inbound messages above `max_message_size` fail the read and close the
/// connection. A failed upgrade only affects this request.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let max_message_size = state.config.max_message_size;
    ws.max_message_size(max_message_size)
        .max_frame_size(max_message_size)
        .on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| serve_client(socket, state.hub.clone(), state.config.clone()))
}

/// Serve one upgraded connection until it ends.
///
/// Constructs the client, registers it with the Hub and runs the inbound and
/// outbound pumps as separate tasks. When the inbound pump stops (peer close,
/// read error, heartbeat timeout, or outbound pump failure) the client is
/// removed from every joined room and from the Hub. Dropping the last client
/// handle then closes the outbound queue, so the outbound pump sends a close
/// frame and exits.
pub async fn serve_client(socket: WebSocket, hub: Hub, config: ServerConfig) {
    let (client, queue) = ClientHandle::new(config.outbound_capacity);
    let client_id = client.id();
    if let Err(e) = hub.register_client(client.clone()).await {
        tracing::error!("Failed to register client '{}': {}", client_id, e);
        return;
    }
    tracing::info!("Client '{}' connected", client_id);

    let (sink, stream) = socket.split();
    let (outbound_done_tx, outbound_done_rx) = oneshot::channel::<()>();

    let outbound_config = config.clone();
    let mut outbound = tokio::spawn(async move {
        let reason = outbound_pump(sink, queue, &outbound_config).await;
        drop(outbound_done_tx);
        reason
    });

    let inbound_config = config.clone();
    let dispatcher = Dispatcher::new(hub.clone(), client);
    let inbound = tokio::spawn(async move {
        inbound_pump(stream, dispatcher, &inbound_config, outbound_done_rx).await
    });

    match inbound.await {
        Ok((mut dispatcher, reason)) => {
            tracing::info!("Client '{}' inbound pump stopped: {:?}", client_id, reason);
            let removed = dispatcher.leave_all().await;
            tracing::debug!("Client '{}' removed from {} room(s)", client_id, removed);
        }
        Err(e) => {
            tracing::error!("Inbound pump of client '{}' failed: {}", client_id, e);
        }
    }

    if let Err(e) = hub.unregister_client(client_id).await {
        tracing::warn!("Failed to unregister client '{}': {}", client_id, e);
    }

    match time::timeout(config.write_wait, &mut outbound).await {
        Ok(Ok(reason)) => {
            tracing::debug!("Client '{}' outbound pump stopped: {:?}", client_id, reason);
        }
        Ok(Err(e)) => {
            tracing::error!("Outbound pump of client '{}' failed: {}", client_id, e);
        }
        Err(_) => {
            tracing::warn!("Outbound pump of client '{}' did not stop, aborting", client_id);
            outbound.abort();
        }
    }

    tracing::info!("Client '{}' disconnected", client_id);
}
