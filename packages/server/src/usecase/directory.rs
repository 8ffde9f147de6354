//! Room lookup seam used by the dispatcher.
//!
//! `Hub` is the production implementation; dispatcher tests substitute a
//! mockall mock.

use async_trait::async_trait;

use crate::{
    domain::{HubError, RoomName},
    infrastructure::Room,
};

/// Room registry operations the dispatcher needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// Pure lookup, no side effect
    async fn find_room_by_name(&self, name: &RoomName) -> Result<Option<Room>, HubError>;

    /// Lookup, creating the room if absent, applied atomically.
    /// The flag is `true` when the room was created by this call.
    async fn find_or_create_room(&self, name: &RoomName) -> Result<(Room, bool), HubError>;
}
