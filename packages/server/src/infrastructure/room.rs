//! Room actor: membership and ordered fan-out for one named group.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ClientId, RoomError, RoomName};

use super::{
    COMMAND_CHANNEL_CAPACITY, ClientHandle, Delivery,
    dto::websocket::{CommandKind, WireMessage},
};

enum RoomCommand {
    /// A client joins the room
    Register {
        client: ClientHandle,
        reply: oneshot::Sender<bool>,
    },
    /// A client leaves the room
    Unregister {
        id: ClientId,
        reply: oneshot::Sender<bool>,
    },
    /// Send a message to every member
    Broadcast {
        from: ClientId,
        payload: String,
        reply: oneshot::Sender<usize>,
    },
    /// Snapshot of the member IDs
    Members { reply: oneshot::Sender<Vec<ClientId>> },
}

impl std::fmt::Debug for RoomCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register { client, .. } => write!(f, "Register({})", client.id()),
            Self::Unregister { id, .. } => write!(f, "Unregister({id})"),
            Self::Broadcast { from, .. } => write!(f, "Broadcast(from {from})"),
            Self::Members { .. } => f.write_str("Members"),
        }
    }
}

/// Handle to a running Room actor.
///
/// Every operation is processed by the actor in arrival order and replies once
/// applied, so a completed `unregister` guarantees no later broadcast reaches
/// that client.
#[derive(Debug, Clone)]
pub struct Room {
    name: RoomName,
    created_at: i64,
    tx: mpsc::Sender<RoomCommand>,
}

impl Room {
    /// Spawn the actor task for a new, empty room.
    ///
    /// The task lives until every `Room` handle is dropped.
    pub fn spawn(name: RoomName, created_at: i64, echo_to_sender: bool) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let actor = RoomActor {
            name: name.clone(),
            members: HashMap::new(),
            echo_to_sender,
            rx,
        };
        tokio::spawn(actor.serve());
        Self {
            name,
            created_at,
            tx,
        }
    }

    pub fn name(&self) -> &RoomName {
        &self.name
    }

    /// Unix timestamp (milliseconds) of creation
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Add a member. Returns `false` if it was already a member (no-op).
    pub async fn register(&self, client: ClientHandle) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::Register { client, reply }).await
    }

    /// Remove a member. Returns `false` if it was not a member (no-op).
    pub async fn unregister(&self, id: ClientId) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::Unregister { id, reply }).await
    }

    /// Fan `payload` out to the current members.
    ///
    /// Returns the number of members the message was queued for.
    pub async fn broadcast(&self, from: ClientId, payload: String) -> Result<usize, RoomError> {
        self.request(|reply| RoomCommand::Broadcast {
            from,
            payload,
            reply,
        })
        .await
    }

    pub async fn members(&self) -> Result<Vec<ClientId>, RoomError> {
        self.request(|reply| RoomCommand::Members { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))?;
        rx.await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }
}

struct RoomActor {
    name: RoomName,
    members: HashMap<ClientId, ClientHandle>,
    echo_to_sender: bool,
    rx: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn serve(mut self) {
        tracing::debug!("Room '{}' started", self.name);
        while let Some(command) = self.rx.recv().await {
            tracing::trace!("Room '{}' handling {:?}", self.name, command);
            self.handle(command);
        }
        tracing::debug!("Room '{}' stopped", self.name);
    }

    fn handle(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Register { client, reply } => {
                let id = client.id();
                let added = if self.members.contains_key(&id) {
                    false
                } else {
                    self.members.insert(id, client);
                    true
                };
                if added {
                    tracing::info!(
                        "Client '{}' joined room '{}' ({} members)",
                        id,
                        self.name,
                        self.members.len()
                    );
                }
                let _ = reply.send(added);
            }
            RoomCommand::Unregister { id, reply } => {
                let removed = self.members.remove(&id).is_some();
                if removed {
                    tracing::info!(
                        "Client '{}' left room '{}' ({} members)",
                        id,
                        self.name,
                        self.members.len()
                    );
                }
                let _ = reply.send(removed);
            }
            RoomCommand::Broadcast {
                from,
                payload,
                reply,
            } => {
                let _ = reply.send(self.fan_out(from, payload));
            }
            RoomCommand::Members { reply } => {
                let mut ids: Vec<ClientId> = self.members.keys().copied().collect();
                ids.sort();
                let _ = reply.send(ids);
            }
        }
    }

    fn fan_out(&mut self, from: ClientId, payload: String) -> usize {
        let document = WireMessage::new(CommandKind::ChatMessage, self.name.as_str(), payload)
            .with_from(from.to_string());
        let text = match document.encode() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to encode broadcast for room '{}': {}", self.name, e);
                return 0;
            }
        };

        let mut queued = 0;
        let mut closed = Vec::new();
        for (id, member) in &self.members {
            if *id == from && !self.echo_to_sender {
                continue;
            }
            match member.deliver(text.clone()) {
                Delivery::Queued => queued += 1,
                Delivery::Dropped => {}
                Delivery::Closed => closed.push(*id),
            }
        }

        // the outbound pump of these members is gone
        for id in closed {
            self.members.remove(&id);
            tracing::debug!("Pruned closed client '{}' from room '{}'", id, self.name);
        }

        queued
    }
}
