//! Room broadcast server library.
//!
//! Clients connect over WebSocket, join named rooms and exchange text messages
//! fanned out to every member of a room. The Hub and every Room are actors:
//! each owns its state and is mutated only through its own command channel.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

pub use config::ServerConfig;
pub use infrastructure::{ClientHandle, Hub, Room};
