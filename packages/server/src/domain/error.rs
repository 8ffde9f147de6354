//! Domain error types.

use thiserror::Error;

use super::RoomName;

/// Validation errors for value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room name must not be empty")]
    EmptyRoomName,
}

/// The Hub actor is no longer accepting commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("hub is unavailable")]
    Unavailable,
}

/// A Room actor is no longer accepting commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room '{0}' is unavailable")]
    Unavailable(RoomName),
}
