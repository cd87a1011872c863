//! Routes inbound commands to the right room actor, spawning one the first
//! time a room is created and tearing it down once empty (spec.md §5
//! Concurrency & resource model, SPEC_FULL.md §5).
//!
//! Holds two maps, each guarded only for insert/lookup/remove — no command
//! is ever processed while holding either lock, since the actual mutation
//! happens inside the room's own task:
//! - `rooms`: which task owns a given room right now.
//! - `player_rooms`: which room a connected player currently belongs to,
//!   so commands that don't carry a `room_id` (`leave_room`,
//!   `player_wants_to_play_again`) can still be routed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{CommandHandler, InboundCommand, RoomEvent};
use crate::domain::entities::{PlayerId, RoomId};
use crate::domain::repositories::RoomRepository;

use super::room_actor::{spawn_room_actor, RoomHandle};

pub struct RoomManager<R: RoomRepository> {
    handler: Arc<CommandHandler<R>>,
    room_repo: Arc<R>,
    broadcaster: async_broadcast::Sender<RoomEvent>,
    rooms: Arc<RwLock<HashMap<RoomId, RoomHandle>>>,
    player_rooms: Arc<RwLock<HashMap<PlayerId, RoomId>>>,
}

impl<R: RoomRepository + 'static> RoomManager<R> {
    pub fn new(room_repo: Arc<R>, broadcaster: async_broadcast::Sender<RoomEvent>) -> Self {
        Self {
            handler: Arc::new(CommandHandler::new(room_repo.clone())),
            room_repo,
            broadcaster,
            rooms: Arc::new(RwLock::new(HashMap::new())),
            player_rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A fresh feed of every event broadcast across every room; the
    /// transport is responsible for filtering to the rooms a connection
    /// actually cares about.
    pub fn subscribe(&self) -> async_broadcast::Receiver<RoomEvent> {
        self.broadcaster.new_receiver()
    }

    pub async fn dispatch(
        &self,
        player_id: PlayerId,
        command: InboundCommand,
    ) -> Result<Vec<RoomEvent>, String> {
        if creates_or_finds_a_room(&command) {
            return self.dispatch_lobby_command(player_id, command).await;
        }

        let is_join = matches!(command, InboundCommand::JoinRoom { .. });
        let room_id = match room_id_of(&command) {
            Some(id) => id,
            None => self
                .player_rooms
                .read()
                .await
                .get(&player_id)
                .cloned()
                .ok_or_else(|| "player is not in a room".to_string())?,
        };

        if is_join {
            self.player_rooms.write().await.insert(player_id.clone(), room_id.clone());
        }

        let handle = self
            .rooms
            .read()
            .await
            .get(&room_id)
            .cloned()
            .ok_or_else(|| "room has no running actor".to_string())?;

        let events = handle.dispatch(player_id.clone(), command).await?;

        if events.iter().any(|e| matches!(e.event, crate::api::OutboundEvent::PlayerLeft { .. })) {
            self.player_rooms.write().await.remove(&player_id);
        }
        if events
            .iter()
            .any(|e| matches!(&e.event, crate::api::OutboundEvent::PlayerLeft { room: None, .. }))
        {
            if let Some(handle) = self.rooms.write().await.remove(&room_id) {
                handle.shutdown();
            }
        }

        Ok(events)
    }

    /// `create_room`, `quick_game` and `create_bot_room` have no room actor
    /// to route to yet — the repository's own lock is what serializes them
    /// (spec.md §5 Shared resources) — so these run once through the
    /// shared, stateless handler, and the resulting room gets its actor.
    async fn dispatch_lobby_command(
        &self,
        player_id: PlayerId,
        command: InboundCommand,
    ) -> Result<Vec<RoomEvent>, String> {
        let events = self
            .handler
            .handle(player_id.clone(), command)
            .await
            .map_err(|err| err.message)?;

        for event in &events {
            let _ = self.broadcaster.try_broadcast(event.clone());
        }

        if let Some(room_id) = events.first().map(|event| event.room_id.clone()) {
            let handle = self.ensure_actor(room_id.clone()).await;
            self.player_rooms.write().await.insert(player_id, room_id);
            // The room may have just become a waiting public room with its
            // first occupant(s) before any actor existed to arm the staged
            // quick-game start timer (spec.md §4.4) — re-check now.
            handle.check_auto_start();
        }

        Ok(events)
    }

    async fn ensure_actor(&self, room_id: RoomId) -> RoomHandle {
        if let Some(handle) = self.rooms.read().await.get(&room_id).cloned() {
            return handle;
        }
        let mut rooms = self.rooms.write().await;
        if let Some(handle) = rooms.get(&room_id).cloned() {
            return handle;
        }
        let handle = spawn_room_actor(
            room_id.clone(),
            self.handler.clone(),
            self.room_repo.clone(),
            self.broadcaster.clone(),
        );
        rooms.insert(room_id, handle.clone());
        handle
    }
}

fn creates_or_finds_a_room(command: &InboundCommand) -> bool {
    matches!(
        command,
        InboundCommand::CreateRoom { .. } | InboundCommand::QuickGame { .. } | InboundCommand::CreateBotRoom { .. }
    )
}

fn room_id_of(command: &InboundCommand) -> Option<RoomId> {
    match command {
        InboundCommand::JoinRoom { room_id, .. }
        | InboundCommand::SetQuickGameConfig { room_id, .. }
        | InboundCommand::StartPrivateGame { room_id }
        | InboundCommand::GetRoomState { room_id }
        | InboundCommand::CompleteTurn { room_id, .. }
        | InboundCommand::CallYaniv { room_id }
        | InboundCommand::SlapDown { room_id, .. } => Some(room_id.clone()),
        InboundCommand::LeaveRoom { .. } | InboundCommand::PlayerWantsToPlayAgain => None,
        InboundCommand::CreateRoom { .. } | InboundCommand::QuickGame { .. } | InboundCommand::CreateBotRoom { .. } => {
            None
        }
    }
}
