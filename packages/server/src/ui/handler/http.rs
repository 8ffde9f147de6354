//! HTTP API endpoint handlers.

use std::{fmt::Display, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use roomcast_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{RoomError, RoomName},
    infrastructure::{
        Room,
        dto::http::{HealthDto, RoomSummaryDto},
    },
    ui::state::AppState,
};

fn unavailable(e: impl Display) -> StatusCode {
    tracing::error!("Registry unavailable: {}", e);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn summarize(room: &Room) -> Result<RoomSummaryDto, RoomError> {
    let members = room.members().await?;
    Ok(RoomSummaryDto {
        name: room.name().to_string(),
        members: members.iter().map(|id| id.to_string()).collect(),
        created_at: timestamp_to_rfc3339(room.created_at()),
    })
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthDto>, StatusCode> {
    let clients = state.hub.client_count().await.map_err(unavailable)?;
    let rooms = state.hub.rooms().await.map_err(unavailable)?.len();
    Ok(Json(HealthDto {
        status: "ok".to_string(),
        clients,
        rooms,
    }))
}

/// Get list of rooms, sorted by name
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let rooms = state.hub.rooms().await.map_err(unavailable)?;
    let mut summaries = Vec::with_capacity(rooms.len());
    for room in &rooms {
        summaries.push(summarize(room).await.map_err(unavailable)?);
    }
    Ok(Json(summaries))
}

/// Get one room by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    let name = RoomName::new(name).map_err(|_| StatusCode::BAD_REQUEST)?;
    match state
        .hub
        .find_room_by_name(&name)
        .await
        .map_err(unavailable)?
    {
        Some(room) => Ok(Json(summarize(&room).await.map_err(unavailable)?)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
