//! UI layer: HTTP/WebSocket surface of the broadcast server.

mod handler;
pub mod pump;
mod server;
mod signal;
pub mod state;

pub use handler::websocket::serve_client;
pub use server::{Server, build_router};
