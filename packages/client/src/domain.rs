//! Domain logic for client-side operations.
//!
//! Pure functions deciding what to send and whether to reconnect, kept free
//! of I/O so they are easy to test.

use roomcast_server::infrastructure::dto::websocket::WireMessage;

use crate::{command::Input, error::ClientError};

/// What the session should do with one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send this document to the server
    Send(WireMessage),
    /// Print a local notice; nothing is sent
    Notice(String),
    /// End the session without reconnecting
    Quit,
}

/// Turn parsed input into an action, updating the current room.
///
/// Joining makes the joined room current. Leaving the current room leaves the
/// client without one until the next join.
pub fn apply_input(input: Input, current_room: &mut Option<String>) -> Action {
    match input {
        Input::Join(room) => {
            *current_room = Some(room.clone());
            Action::Send(WireMessage::join(room))
        }
        Input::Leave(Some(room)) => {
            if current_room.as_deref() == Some(room.as_str()) {
                *current_room = None;
            }
            Action::Send(WireMessage::leave(room))
        }
        Input::Leave(None) => match current_room.take() {
            Some(room) => Action::Send(WireMessage::leave(room)),
            None => Action::Notice("not in a room".to_string()),
        },
        Input::Chat(text) => match current_room {
            Some(room) => Action::Send(WireMessage::chat(room.as_str(), text)),
            None => Action::Notice("not in a room; use /join <room>".to_string()),
        },
        Input::Quit => Action::Quit,
        Input::Usage(usage) => Action::Notice(usage.to_string()),
    }
}

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Count of consecutive failed attempts after `error`.
///
/// A dropped connection had connected first, so the streak restarts and this
/// drop is its first failure. A failure to connect extends the streak.
pub fn failed_attempts_after(error: &ClientError, previous: u32) -> u32 {
    match error {
        ClientError::ConnectionLost(_) => 1,
        _ => previous.saturating_add(1),
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
