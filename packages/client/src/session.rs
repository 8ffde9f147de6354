//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use roomcast_server::infrastructure::dto::websocket::WireMessage;
use roomcast_shared::time::now_millis;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::{
    command::parse_input,
    domain::{Action, apply_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Print every document in a (possibly coalesced) text frame
fn print_frame(text: &str) {
    let received_at = now_millis();
    for document in WireMessage::split_frame(text) {
        let formatted = match WireMessage::decode(document) {
            Ok(message) => MessageFormatter::format_document(&message, received_at),
            Err(_) => MessageFormatter::format_raw_message(document),
        };
        print!("{}", formatted);
    }
    redisplay_prompt();
}

/// Run one WebSocket session until the user quits or the connection drops.
///
/// Rejoins `current_room` right after connecting, so a reconnect lands the
/// user back where they were. Returns `Ok` when the user ended the session.
pub async fn run_client_session(
    url: &str,
    current_room: &mut Option<String>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(WsError::Url(e)) => {
            tracing::debug!("Rejected URL: {}", e);
            return Err(ClientError::InvalidUrl(url.to_string()));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to roomcast server!");
    println!(
        "\nType messages and press Enter to send. Commands: /join <room>, /leave [room], /quit\n"
    );

    let (mut write, mut read) = ws_stream.split();

    if let Some(room) = current_room.as_deref() {
        let json = WireMessage::join(room)
            .encode()
            .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
        write
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
        print!("{}", MessageFormatter::format_notice(&format!("joined {}", room)));
    }

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => print_frame(text.as_str()),
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let write_loop = async {
        while let Some(line) = input_rx.recv().await {
            match apply_input(parse_input(&line), current_room) {
                Action::Send(message) => {
                    let json = match message.encode() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        tracing::warn!("Failed to send message: {}", e);
                        return Err(ClientError::ConnectionLost(e.to_string()));
                    }
                }
                Action::Notice(text) => print!("{}", MessageFormatter::format_notice(&text)),
                Action::Quit => break,
            }
        }

        // /quit, or the terminal closed
        write.close().await.ok();
        Ok(())
    };

    // If either side completes, stop the other
    tokio::select! {
        _ = &mut read_task => {
            Err(ClientError::ConnectionLost("server closed the connection".to_string()))
        }
        result = write_loop => {
            read_task.abort();
            result
        }
    }
}
