//! Message formatting utilities for client display.

use roomcast_server::infrastructure::dto::websocket::{CommandKind, WireMessage};
use roomcast_shared::time::timestamp_to_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one incoming document.
    ///
    /// Chat documents are shown with room and sender; anything else the server
    /// sends is shown raw.
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded document
    /// * `received_at` - Unix timestamp when the frame arrived (milliseconds)
    pub fn format_document(message: &WireMessage, received_at: i64) -> String {
        match message.r#type {
            CommandKind::ChatMessage => Self::format_chat_message(
                &message.room_name,
                message.from.as_deref().unwrap_or("unknown"),
                &message.payload,
                received_at,
            ),
            other => Self::format_raw_message(&format!("{:?} {}", other, message.payload)),
        }
    }

    /// Format a chat message
    pub fn format_chat_message(room: &str, from: &str, content: &str, received_at: i64) -> String {
        format!(
            "\n[{}] @{}: {}\n      received at {}\n",
            room,
            short_id(from),
            content,
            timestamp_to_rfc3339(received_at)
        )
    }

    /// Format a local notice (command feedback, not from the server)
    pub fn format_notice(text: &str) -> String {
        format!("* {}\n", text)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

/// First block of a UUID, enough to tell senders apart on screen
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_chat_document() {
        // テスト項目: チャットドキュメントがルーム名・送信者・本文付きでフォーマットされる
        // given (前提条件):
        let message = WireMessage::chat("lobby", "Hello, world!")
            .with_from("3f2b8c1e-0000-4000-8000-000000000000");
        let received_at = 1672531200000;

        // when (操作):
        let result = MessageFormatter::format_document(&message, received_at);

        // then (期待する結果):
        assert!(result.contains("[lobby]"));
        assert!(result.contains("@3f2b8c1e:"));
        assert!(result.contains("Hello, world!"));
        assert!(result.contains("2023-01-01"));
    }

    #[test]
    fn test_format_chat_document_without_sender() {
        // テスト項目: 送信者のないチャットドキュメントは unknown として表示される
        // given (前提条件):
        let message = WireMessage::chat("lobby", "hi");

        // when (操作):
        let result = MessageFormatter::format_document(&message, 0);

        // then (期待する結果):
        assert!(result.contains("@unknown: hi"));
    }

    #[test]
    fn test_format_other_document_as_raw() {
        // テスト項目: チャット以外のドキュメントは生の内容として表示される
        // given (前提条件):
        let message = WireMessage::new(CommandKind::CallOffer, "lobby", "sdp");

        // when (操作):
        let result = MessageFormatter::format_document(&message, 0);

        // then (期待する結果):
        assert!(result.contains("Received:"));
        assert!(result.contains("CallOffer sdp"));
    }

    #[test]
    fn test_format_notice() {
        // テスト項目: ローカル通知が正しくフォーマットされる
        // given (前提条件):
        let text = "not in a room";

        // when (操作):
        let result = MessageFormatter::format_notice(text);

        // then (期待する結果):
        assert_eq!(result, "* not in a room\n");
    }

    #[test]
    fn test_format_binary_message() {
        // テスト項目: バイナリメッセージ通知が正しくフォーマットされる
        // given (前提条件):
        let byte_count = 1024;

        // when (操作):
        let result = MessageFormatter::format_binary_message(byte_count);

        // then (期待する結果):
        assert!(result.contains("1024 bytes"));
        assert!(result.contains("Received"));
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 生メッセージが正しくフォーマットされる
        // given (前提条件):
        let text = "unknown message format";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert!(result.contains("unknown message format"));
        assert!(result.contains("Received:"));
    }
}
