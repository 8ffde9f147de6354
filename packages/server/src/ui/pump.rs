//! Connection pump pair.
//!
//! Each connection runs two tasks: the inbound pump reads frames and feeds the
//! dispatcher, the outbound pump drains the client's queue and owns every write
//! to the socket, including heartbeat probes and the final close frame.

use std::{fmt::Display, time::Duration};

use axum::{body::Bytes, extract::ws::Message};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant, MissedTickBehavior},
};

use crate::{
    config::ServerConfig,
    infrastructure::dto::websocket::FRAME_SEPARATOR,
    usecase::{DispatchError, Dispatcher, RoomDirectory},
};

/// Why a pump stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    /// Close frame received or the stream ended
    PeerClosed,
    ReadError,
    /// Nothing received within the liveness window
    HeartbeatTimeout,
    /// Inbound message above `max_message_size`
    MessageTooLarge,
    /// The outbound pump stopped first
    OutboundStopped,
    /// Every client handle was dropped; close frame sent
    QueueClosed,
    WriteError,
    WriteTimeout,
}

/// Read frames until the connection ends, dispatching each text frame.
///
/// The read deadline is `pong_wait` from the last received frame of any kind,
/// so heartbeat acknowledgments keep an idle client alive. Decode and routing
/// errors are logged and the frame dropped; the connection stays open.
///
/// Returns the dispatcher so the caller can run the cleanup cascade.
pub async fn inbound_pump<S, E, D>(
    mut stream: S,
    mut dispatcher: Dispatcher<D>,
    config: &ServerConfig,
    mut outbound_done: oneshot::Receiver<()>,
) -> (Dispatcher<D>, Disconnect)
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
    D: RoomDirectory,
{
    let client_id = dispatcher.client().id();

    let reason = loop {
        let next = tokio::select! {
            _ = &mut outbound_done => break Disconnect::OutboundStopped,
            next = time::timeout(config.pong_wait, stream.next()) => next,
        };

        let message = match next {
            Err(_) => {
                tracing::info!("Client '{}' missed the heartbeat deadline", client_id);
                break Disconnect::HeartbeatTimeout;
            }
            Ok(None) => break Disconnect::PeerClosed,
            Ok(Some(Err(e))) => {
                tracing::warn!("WebSocket read error from '{}': {}", client_id, e);
                break Disconnect::ReadError;
            }
            Ok(Some(Ok(message))) => message,
        };

        match message {
            Message::Text(text) => {
                let text = text.as_str();
                if text.len() > config.max_message_size {
                    tracing::warn!(
                        "Client '{}' sent {} bytes (max {}), closing",
                        client_id,
                        text.len(),
                        config.max_message_size
                    );
                    break Disconnect::MessageTooLarge;
                }
                match dispatcher.dispatch(text).await {
                    Ok(outcome) => {
                        tracing::debug!("Client '{}': {:?}", client_id, outcome);
                    }
                    Err(DispatchError::Decode(e)) => {
                        tracing::warn!("Dropping malformed frame from '{}': {}", client_id, e);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to dispatch frame from '{}': {}", client_id, e);
                    }
                }
            }
            Message::Binary(data) => {
                if data.len() > config.max_message_size {
                    break Disconnect::MessageTooLarge;
                }
                tracing::debug!("Ignoring binary frame from '{}'", client_id);
            }
            Message::Pong(_) => {
                tracing::trace!("Heartbeat acknowledged by '{}'", client_id);
            }
            Message::Ping(_) => {
                // answered by the protocol layer
            }
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", client_id);
                break Disconnect::PeerClosed;
            }
        }
    };

    (dispatcher, reason)
}

/// Write queued messages and heartbeat probes until the queue closes or a
/// write fails.
///
/// Messages already queued when a flush starts are joined into one text frame
/// with `\n`, preserving their order.
pub async fn outbound_pump<S>(
    mut sink: S,
    mut queue: mpsc::Receiver<String>,
    config: &ServerConfig,
) -> Disconnect
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let period = config.ping_period();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            item = queue.recv() => {
                let Some(first) = item else {
                    let _ = time::timeout(config.write_wait, sink.send(Message::Close(None))).await;
                    return Disconnect::QueueClosed;
                };
                let frame = coalesce(first, &mut queue);
                if let Err(reason) = write(&mut sink, Message::Text(frame.into()), config.write_wait).await {
                    return reason;
                }
            }
            _ = ticker.tick() => {
                if let Err(reason) = write(&mut sink, Message::Ping(Bytes::new()), config.write_wait).await {
                    tracing::info!("Heartbeat probe failed");
                    return reason;
                }
            }
        }
    }
}

/// Append the items queued at this instant to `first`.
fn coalesce(first: String, queue: &mut mpsc::Receiver<String>) -> String {
    let pending = queue.len();
    let mut frame = first;
    for _ in 0..pending {
        match queue.try_recv() {
            Ok(next) => {
                frame.push(FRAME_SEPARATOR);
                frame.push_str(&next);
            }
            Err(_) => break,
        }
    }
    frame
}

async fn write<S>(sink: &mut S, message: Message, write_wait: Duration) -> Result<(), Disconnect>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match time::timeout(write_wait, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::warn!("WebSocket write failed: {}", e);
            Err(Disconnect::WriteError)
        }
        Err(_) => {
            tracing::warn!("WebSocket write timed out after {:?}", write_wait);
            Err(Disconnect::WriteTimeout)
        }
    }
}
