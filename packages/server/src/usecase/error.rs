//! UseCase error types.

use thiserror::Error;

use crate::domain::{HubError, RoomError, ValueObjectError};

/// Errors while dispatching one inbound frame.
///
/// None of them close the connection; the pump logs and moves on.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid room name: {0}")]
    InvalidRoomName(#[from] ValueObjectError),

    #[error(transparent)]
    Hub(#[from] HubError),

    #[error(transparent)]
    Room(#[from] RoomError),
}
