//! Infrastructure layer: the in-memory actors and wire formats.
//!
//! - `hub`: process-wide registry of clients and rooms
//! - `room`: one actor per named broadcast group
//! - `client`: per-connection handle wrapping the bounded outbound queue
//! - `dto`: WebSocket and HTTP data transfer objects

pub mod client;
pub mod dto;
pub mod hub;
pub mod room;

pub use client::{ClientHandle, Delivery};
pub use hub::Hub;
pub use room::Room;

/// Capacity of the Hub's and every Room's command channel.
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;
