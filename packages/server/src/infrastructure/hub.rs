//! Hub actor: process-wide registry of connected clients and rooms.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use roomcast_shared::time::{Clock, SystemClock};
use tokio::sync::{mpsc, oneshot};

use crate::{
    config::ServerConfig,
    domain::{ClientId, HubError, RoomName},
    usecase::RoomDirectory,
};

use super::{COMMAND_CHANNEL_CAPACITY, ClientHandle, Room};

enum HubCommand {
    RegisterClient {
        client: ClientHandle,
        reply: oneshot::Sender<()>,
    },
    UnregisterClient {
        id: ClientId,
        reply: oneshot::Sender<bool>,
    },
    FindRoom {
        name: RoomName,
        reply: oneshot::Sender<Option<Room>>,
    },
    CreateRoom {
        name: RoomName,
        reply: oneshot::Sender<Room>,
    },
    /// Lookup and creation as one command, so concurrent joins for the same
    /// unknown name create exactly one room
    FindOrCreateRoom {
        name: RoomName,
        reply: oneshot::Sender<(Room, bool)>,
    },
    ClientCount {
        reply: oneshot::Sender<usize>,
    },
    Rooms {
        reply: oneshot::Sender<Vec<Room>>,
    },
}

/// Handle to the Hub actor.
///
/// All registry state lives in the actor task; callers only send commands.
/// Commands are applied one at a time, so they are linearized with respect to
/// each other.
#[derive(Clone)]
pub struct Hub {
    tx: mpsc::Sender<HubCommand>,
}

impl Hub {
    /// Spawn the Hub actor with the system clock.
    pub fn spawn(config: &ServerConfig) -> Self {
        Self::spawn_with_clock(config, Arc::new(SystemClock))
    }

    /// Spawn the Hub actor; `clock` stamps room creation times.
    pub fn spawn_with_clock(config: &ServerConfig, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let actor = HubActor {
            clients: HashMap::new(),
            rooms: HashMap::new(),
            echo_to_sender: config.echo_to_sender,
            clock,
            rx,
        };
        tokio::spawn(actor.serve());
        Self { tx }
    }

    pub async fn register_client(&self, client: ClientHandle) -> Result<(), HubError> {
        self.request(|reply| HubCommand::RegisterClient { client, reply }).await
    }

    /// Remove a client from the active set. Returns `false` if it was absent.
    pub async fn unregister_client(&self, id: ClientId) -> Result<bool, HubError> {
        self.request(|reply| HubCommand::UnregisterClient { id, reply }).await
    }

    pub async fn find_room_by_name(&self, name: &RoomName) -> Result<Option<Room>, HubError> {
        let name = name.clone();
        self.request(|reply| HubCommand::FindRoom { name, reply }).await
    }

    /// Insert a new empty room under `name`.
    ///
    /// If the name is already taken the existing room is returned, so two rooms
    /// with the same name can never coexist.
    pub async fn create_room(&self, name: &RoomName) -> Result<Room, HubError> {
        let name = name.clone();
        self.request(|reply| HubCommand::CreateRoom { name, reply }).await
    }

    /// Look up `name`, creating the room if absent. The flag is `true` when
    /// this call created it.
    pub async fn find_or_create_room(&self, name: &RoomName) -> Result<(Room, bool), HubError> {
        let name = name.clone();
        self.request(|reply| HubCommand::FindOrCreateRoom { name, reply }).await
    }

    pub async fn client_count(&self) -> Result<usize, HubError> {
        self.request(|reply| HubCommand::ClientCount { reply }).await
    }

    /// All rooms, sorted by name
    pub async fn rooms(&self) -> Result<Vec<Room>, HubError> {
        self.request(|reply| HubCommand::Rooms { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> HubCommand,
    ) -> Result<T, HubError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| HubError::Unavailable)?;
        rx.await.map_err(|_| HubError::Unavailable)
    }
}

#[async_trait]
impl RoomDirectory for Hub {
    async fn find_room_by_name(&self, name: &RoomName) -> Result<Option<Room>, HubError> {
        Hub::find_room_by_name(self, name).await
    }

    async fn find_or_create_room(&self, name: &RoomName) -> Result<(Room, bool), HubError> {
        Hub::find_or_create_room(self, name).await
    }
}

struct HubActor {
    /// 接続中のクライアント
    clients: HashMap<ClientId, ClientHandle>,
    /// ルーム名 → ルーム
    rooms: HashMap<RoomName, Room>,
    echo_to_sender: bool,
    clock: Arc<dyn Clock>,
    rx: mpsc::Receiver<HubCommand>,
}

impl HubActor {
    async fn serve(mut self) {
        tracing::debug!("Hub started");
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        tracing::debug!("Hub stopped");
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::RegisterClient { client, reply } => {
                let id = client.id();
                if self.clients.insert(id, client).is_some() {
                    tracing::warn!("Client '{}' was already registered, replaced", id);
                }
                tracing::info!(
                    "Client '{}' registered ({} connected)",
                    id,
                    self.clients.len()
                );
                let _ = reply.send(());
            }
            HubCommand::UnregisterClient { id, reply } => {
                let removed = self.clients.remove(&id).is_some();
                if removed {
                    tracing::info!(
                        "Client '{}' unregistered ({} connected)",
                        id,
                        self.clients.len()
                    );
                }
                let _ = reply.send(removed);
            }
            HubCommand::FindRoom { name, reply } => {
                let _ = reply.send(self.rooms.get(&name).cloned());
            }
            HubCommand::CreateRoom { name, reply } => {
                let (room, _) = self.find_or_create(name);
                let _ = reply.send(room);
            }
            HubCommand::FindOrCreateRoom { name, reply } => {
                let _ = reply.send(self.find_or_create(name));
            }
            HubCommand::ClientCount { reply } => {
                let _ = reply.send(self.clients.len());
            }
            HubCommand::Rooms { reply } => {
                let mut rooms: Vec<Room> = self.rooms.values().cloned().collect();
                rooms.sort_by(|a, b| a.name().cmp(b.name()));
                let _ = reply.send(rooms);
            }
        }
    }

    fn find_or_create(&mut self, name: RoomName) -> (Room, bool) {
        if let Some(room) = self.rooms.get(&name) {
            return (room.clone(), false);
        }
        let room = Room::spawn(name.clone(), self.clock.now_millis(), self.echo_to_sender);
        tracing::info!("Room '{}' created ({} rooms)", name, self.rooms.len() + 1);
        self.rooms.insert(name, room.clone());
        (room, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcast_shared::time::FixedClock;

    fn hub() -> Hub {
        Hub::spawn_with_clock(&ServerConfig::default(), Arc::new(FixedClock::new(42)))
    }

    fn name(raw: &str) -> RoomName {
        RoomName::try_from(raw).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_unregister_client() {
        // テスト項目: クライアントの登録と削除がクライアント集合に反映される
        // given (前提条件):
        let hub = hub();
        let (alice, _rx) = ClientHandle::new(8);
        let (bob, _rx2) = ClientHandle::new(8);
        hub.register_client(alice.clone()).await.unwrap();
        hub.register_client(bob.clone()).await.unwrap();

        // when (操作):
        let removed = hub.unregister_client(alice.id()).await.unwrap();

        // then (期待する結果):
        assert!(removed);
        assert_eq!(hub.client_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unregister_absent_client_is_noop() {
        // テスト項目: 未登録クライアントの削除は何もしない
        // given (前提条件):
        let hub = hub();
        let (alice, _rx) = ClientHandle::new(8);
        hub.register_client(alice.clone()).await.unwrap();
        hub.unregister_client(alice.id()).await.unwrap();

        // when (操作):
        let removed = hub.unregister_client(alice.id()).await.unwrap();

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(hub.client_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_room_by_name_has_no_side_effect() {
        // テスト項目: 存在しないルームの検索はルームを作らない
        // given (前提条件):
        let hub = hub();

        // when (操作):
        let found = hub.find_room_by_name(&name("lobby")).await.unwrap();

        // then (期待する結果):
        assert!(found.is_none());
        assert!(hub.rooms().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_room_then_find_it() {
        // テスト項目: 作成したルームが名前で検索でき、作成時刻が記録される
        // given (前提条件):
        let hub = hub();

        // when (操作):
        let created = hub.create_room(&name("lobby")).await.unwrap();
        let found = hub.find_room_by_name(&name("lobby")).await.unwrap();

        // then (期待する結果):
        let found = found.expect("room should exist");
        assert_eq!(found.name(), created.name());
        assert_eq!(found.created_at(), 42);
    }

    #[tokio::test]
    async fn test_create_room_twice_keeps_single_room() {
        // テスト項目: 同名ルームを二度作成しても同じルームが返される
        // given (前提条件):
        let hub = hub();
        let first = hub.create_room(&name("lobby")).await.unwrap();
        let (alice, _rx) = ClientHandle::new(8);
        first.register(alice.clone()).await.unwrap();

        // when (操作):
        let second = hub.create_room(&name("lobby")).await.unwrap();

        // then (期待する結果):
        assert_eq!(hub.rooms().await.unwrap().len(), 1);
        assert_eq!(second.members().await.unwrap(), vec![alice.id()]);
    }

    #[tokio::test]
    async fn test_concurrent_find_or_create_creates_exactly_one_room() {
        // テスト項目: 同じ未知のルーム名への同時参加でルームは 1 つだけ作成される
        // given (前提条件):
        let hub = hub();
        let mut tasks = Vec::new();

        // when (操作):
        for _ in 0..32 {
            let hub = hub.clone();
            tasks.push(tokio::spawn(async move {
                hub.find_or_create_room(&name("party")).await.unwrap().1
            }));
        }
        let mut created = 0;
        for task in tasks {
            if task.await.unwrap() {
                created += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(created, 1);
        let rooms = hub.rooms().await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name().as_str(), "party");
    }

    #[tokio::test]
    async fn test_rooms_are_sorted_by_name() {
        // テスト項目: ルーム一覧は名前順に並ぶ
        // given (前提条件):
        let hub = hub();
        for raw in ["zeta", "alpha", "mid"] {
            hub.create_room(&name(raw)).await.unwrap();
        }

        // when (操作):
        let rooms = hub.rooms().await.unwrap();

        // then (期待する結果):
        let names: Vec<&str> = rooms.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_empty_room_is_kept() {
        // テスト項目: メンバーが 0 人になってもルームは削除されない
        // given (前提条件):
        let hub = hub();
        let (room, _) = hub.find_or_create_room(&name("lobby")).await.unwrap();
        let (alice, _rx) = ClientHandle::new(8);
        room.register(alice.clone()).await.unwrap();

        // when (操作):
        room.unregister(alice.id()).await.unwrap();

        // then (期待する結果):
        let found = hub.find_room_by_name(&name("lobby")).await.unwrap();
        assert!(found.is_some());
        assert!(found.unwrap().members().await.unwrap().is_empty());
    }
}
