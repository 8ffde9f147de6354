//! WebSocket frame documents.
//!
//! Every text frame carries one JSON document:
//!
//! ```text
//! {"type": "ChatMessage", "roomName": "lobby", "payload": "hi"}
//! ```
//!
//! Outbound chat documents have the same shape plus a `from` field holding the
//! sender's client ID. Several outbound documents may be coalesced into one
//! frame, separated by `\n`; JSON escaping guarantees a document never contains
//! a raw newline.

use serde::{Deserialize, Serialize};

/// Separator between documents coalesced into one outbound frame.
pub const FRAME_SEPARATOR: char = '\n';

/// Recognized command kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    JoinRoom,
    LeaveRoom,
    ChatMessage,
    CallOffer,
    CallAnswer,
    JoinChannel,
    LeaveChannel,
    /// Any other `type` value, or none at all
    #[default]
    #[serde(other)]
    Unknown,
}

impl CommandKind {
    /// Media-signaling kinds: recognized but not processed by this server
    pub fn is_signaling(self) -> bool {
        matches!(
            self,
            Self::CallOffer | Self::CallAnswer | Self::JoinChannel | Self::LeaveChannel
        )
    }
}

/// One decoded frame document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    #[serde(default)]
    pub r#type: CommandKind,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub payload: String,
    /// Sender's client ID; set on outbound chat documents only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl WireMessage {
    pub fn new(kind: CommandKind, room_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            r#type: kind,
            room_name: room_name.into(),
            payload: payload.into(),
            from: None,
        }
    }

    pub fn join(room_name: impl Into<String>) -> Self {
        Self::new(CommandKind::JoinRoom, room_name, "")
    }

    pub fn leave(room_name: impl Into<String>) -> Self {
        Self::new(CommandKind::LeaveRoom, room_name, "")
    }

    pub fn chat(room_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(CommandKind::ChatMessage, room_name, payload)
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Split a possibly coalesced frame back into its documents.
    pub fn split_frame(frame: &str) -> impl Iterator<Item = &str> {
        frame.split(FRAME_SEPARATOR).filter(|part| !part.is_empty())
    }
}
