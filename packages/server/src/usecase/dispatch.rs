//! Message dispatcher: decodes inbound frames and routes each command.
//!
//! One `Dispatcher` exists per connection and is driven by its inbound pump,
//! so a client's commands are handled strictly in the order they arrived.

use std::collections::HashMap;

use crate::{
    domain::RoomName,
    infrastructure::{
        ClientHandle, Room,
        dto::websocket::{CommandKind, WireMessage},
    },
};

use super::{DispatchError, RoomDirectory};

/// What a single frame resulted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Client registered with the room; `created` if the room is new
    Joined { room: RoomName, created: bool },
    /// Join for a room the client already belongs to
    AlreadyMember { room: RoomName },
    /// Client unregistered from the room
    Left { room: RoomName, was_member: bool },
    /// Leave/Chat for a room that does not exist; nothing happened
    UnknownRoom { kind: CommandKind, room: RoomName },
    /// Chat message fanned out to `recipients` members
    Broadcast { room: RoomName, recipients: usize },
    /// Recognized signaling command without an implementation
    Unimplemented(CommandKind),
    /// Unrecognized command kind
    Ignored,
}

/// Per-connection command router
pub struct Dispatcher<D> {
    directory: D,
    client: ClientHandle,
    /// Rooms joined through this dispatcher and not left since
    joined: HashMap<RoomName, Room>,
}

impl<D: RoomDirectory> Dispatcher<D> {
    pub fn new(directory: D, client: ClientHandle) -> Self {
        Self {
            directory,
            client,
            joined: HashMap::new(),
        }
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }

    /// Names of the rooms this client currently belongs to, sorted
    pub fn joined_rooms(&self) -> Vec<RoomName> {
        let mut names: Vec<RoomName> = self.joined.keys().cloned().collect();
        names.sort();
        names
    }

    /// Decode one text frame and route it.
    pub async fn dispatch(&mut self, frame: &str) -> Result<DispatchOutcome, DispatchError> {
        let message = WireMessage::decode(frame)?;
        self.route(message).await
    }

    pub async fn route(&mut self, message: WireMessage) -> Result<DispatchOutcome, DispatchError> {
        match message.r#type {
            CommandKind::JoinRoom => self.join(RoomName::new(message.room_name)?).await,
            CommandKind::LeaveRoom => self.leave(RoomName::new(message.room_name)?).await,
            CommandKind::ChatMessage => {
                self.chat(RoomName::new(message.room_name)?, message.payload)
                    .await
            }
            kind if kind.is_signaling() => {
                tracing::info!(
                    "Client '{}' sent {:?}, which is not implemented",
                    self.client.id(),
                    kind
                );
                Ok(DispatchOutcome::Unimplemented(kind))
            }
            _ => {
                tracing::debug!("Ignoring unrecognized command from '{}'", self.client.id());
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    async fn join(&mut self, name: RoomName) -> Result<DispatchOutcome, DispatchError> {
        let (room, created) = self.directory.find_or_create_room(&name).await?;
        let added = room.register(self.client.clone()).await?;
        self.joined.insert(name.clone(), room);
        if added {
            Ok(DispatchOutcome::Joined {
                room: name,
                created,
            })
        } else {
            Ok(DispatchOutcome::AlreadyMember { room: name })
        }
    }

    async fn leave(&mut self, name: RoomName) -> Result<DispatchOutcome, DispatchError> {
        let Some(room) = self.directory.find_room_by_name(&name).await? else {
            tracing::debug!("Client '{}' left unknown room '{}'", self.client.id(), name);
            return Ok(DispatchOutcome::UnknownRoom {
                kind: CommandKind::LeaveRoom,
                room: name,
            });
        };
        let was_member = room.unregister(self.client.id()).await?;
        self.joined.remove(&name);
        Ok(DispatchOutcome::Left {
            room: name,
            was_member,
        })
    }

    async fn chat(
        &mut self,
        name: RoomName,
        payload: String,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(room) = self.directory.find_room_by_name(&name).await? else {
            tracing::debug!(
                "Dropping message from '{}' to unknown room '{}'",
                self.client.id(),
                name
            );
            return Ok(DispatchOutcome::UnknownRoom {
                kind: CommandKind::ChatMessage,
                room: name,
            });
        };
        let recipients = room.broadcast(self.client.id(), payload).await?;
        Ok(DispatchOutcome::Broadcast {
            room: name,
            recipients,
        })
    }

    /// Unregister from every joined room, once each.
    ///
    /// Returns how many rooms still had this client as a member.
    pub async fn leave_all(&mut self) -> usize {
        let id = self.client.id();
        let mut removed = 0;
        for (name, room) in self.joined.drain() {
            match room.unregister(id).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to remove '{}' from room '{}': {}", id, name, e),
            }
        }
        removed
    }
}
