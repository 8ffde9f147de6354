//! Data Transfer Objects (DTOs) for the broadcast server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame documents
//! - `http`: HTTP API response DTOs

pub mod http;
pub mod websocket;
