//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    /// Connected clients
    pub clients: usize,
    /// Rooms ever created
    pub rooms: usize,
}

/// Room summary returned by `/api/rooms` and `/api/rooms/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub name: String,
    /// Client IDs of the current members, sorted
    pub members: Vec<String>,
    /// RFC 3339 creation time
    pub created_at: String,
}
