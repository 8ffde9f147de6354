//! Helpers for in-process server tests.

#![allow(dead_code)]

use std::{future::Future, net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use roomcast_server::{
    Hub, ServerConfig,
    domain::{ClientId, RoomName},
    infrastructure::dto::websocket::WireMessage,
    ui::Server,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A server bound to an ephemeral port, with direct access to its Hub
pub struct TestServer {
    pub hub: Hub,
    pub addr: SocketAddr,
}

impl TestServer {
    pub async fn start(config: ServerConfig) -> Self {
        let hub = Hub::spawn(&config);
        let app = Server::new(hub.clone(), config).router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });
        Self { hub, addr }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn connect(&self) -> WsClient {
        let (ws, _response) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        ws
    }

    /// Connect and wait until the Hub has registered `expected_clients` clients
    pub async fn connect_and_register(&self, expected_clients: usize) -> WsClient {
        let ws = self.connect().await;
        let hub = self.hub.clone();
        wait_until(|| {
            let hub = hub.clone();
            async move { hub.client_count().await.unwrap() == expected_clients }
        })
        .await;
        ws
    }

    pub async fn members(&self, room: &str) -> Option<Vec<ClientId>> {
        let name = RoomName::try_from(room).unwrap();
        let room = self.hub.find_room_by_name(&name).await.unwrap()?;
        Some(room.members().await.unwrap())
    }

    /// Wait until `room` has exactly `count` members
    pub async fn wait_for_members(&self, room: &str, count: usize) {
        wait_until(|| async move {
            self.members(room).await.map(|m| m.len()) == Some(count)
        })
        .await;
    }

    pub async fn wait_for_clients(&self, count: usize) {
        wait_until(|| async move { self.hub.client_count().await.unwrap() == count }).await;
    }
}

/// Poll `condition` every 20ms for up to 5 seconds
pub async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition().await {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 5 seconds"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

pub async fn send(ws: &mut WsClient, message: WireMessage) {
    let json = message.encode().unwrap();
    ws.send(Message::Text(json.into()))
        .await
        .expect("Failed to send frame");
}

/// Next chat documents received within `wait`, skipping control frames.
/// Coalesced frames are split into their documents.
pub async fn recv_documents(ws: &mut WsClient, wait: Duration) -> Vec<WireMessage> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let next = tokio::time::timeout_at(deadline, ws.next()).await;
        match next {
            Ok(Some(Ok(Message::Text(text)))) => {
                return WireMessage::split_frame(text.as_str())
                    .map(|doc| WireMessage::decode(doc).expect("server sent malformed JSON"))
                    .collect();
            }
            Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Ok(Some(Err(_))) | Err(_) => {
                return Vec::new();
            }
            Ok(Some(Ok(_))) => continue,
        }
    }
}

/// Collect payloads until `count` documents arrived or `wait` elapsed
pub async fn recv_payloads(ws: &mut WsClient, count: usize, wait: Duration) -> Vec<String> {
    let deadline = tokio::time::Instant::now() + wait;
    let mut payloads = Vec::new();
    while payloads.len() < count {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        let docs = recv_documents(ws, remaining).await;
        if docs.is_empty() {
            break;
        }
        payloads.extend(docs.into_iter().map(|doc| doc.payload));
    }
    payloads
}

/// True if the server closed the connection within `wait`
pub async fn closed_within(ws: &mut WsClient, wait: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return false,
            Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
            Ok(Some(Ok(_))) => continue,
        }
    }
}

pub fn fast_config() -> ServerConfig {
    ServerConfig {
        write_wait: Duration::from_secs(2),
        ..ServerConfig::default()
    }
}
