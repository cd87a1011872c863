//! In-memory `RoomRepository`: a `HashMap` guarded by a single short-lived
//! lock, used only for insert/lookup/remove (spec.md §5 Shared resources).
//! Per-room `GameState` is stored alongside the room under the same lock
//! but is never mutated through this trait outside of `save_game_state` —
//! the owning room actor is the only writer while a round is live.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{Room, RoomId, RoomPhase, RoomVisibility, MAX_PLAYERS};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::value_objects::GameState;

#[derive(Default)]
struct Tables {
    rooms: HashMap<RoomId, Room>,
    game_states: HashMap<RoomId, GameState>,
    player_rooms: HashMap<String, RoomId>,
}

/// The only `RoomRepository` implementation this core ships; persistence
/// across process restarts is explicitly out of scope (spec.md §1).
pub struct InMemoryRoomRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_room(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        Ok(self.tables.read().await.rooms.get(id).cloned())
    }

    async fn find_open_public_room(&self) -> Result<Option<Room>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rooms
            .values()
            .find(|r| {
                r.visibility == RoomVisibility::Public
                    && r.game_state == RoomPhase::Waiting
                    && r.players.len() < MAX_PLAYERS
            })
            .cloned())
    }

    async fn save_room(&self, room: Room) -> Result<(), RepositoryError> {
        self.tables.write().await.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn delete_room(&self, id: &RoomId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.rooms.remove(id);
        tables.game_states.remove(id);
        Ok(())
    }

    async fn find_room_for_player(&self, player_id: &str) -> Result<Option<RoomId>, RepositoryError> {
        Ok(self.tables.read().await.player_rooms.get(player_id).cloned())
    }

    async fn set_player_room(&self, player_id: &str, room_id: RoomId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .player_rooms
            .insert(player_id.to_string(), room_id);
        Ok(())
    }

    async fn clear_player_room(&self, player_id: &str) -> Result<(), RepositoryError> {
        self.tables.write().await.player_rooms.remove(player_id);
        Ok(())
    }

    async fn find_game_state(&self, room_id: &RoomId) -> Result<Option<GameState>, RepositoryError> {
        Ok(self.tables.read().await.game_states.get(room_id).cloned())
    }

    async fn save_game_state(&self, room_id: &RoomId, state: GameState) -> Result<(), RepositoryError> {
        self.tables.write().await.game_states.insert(room_id.clone(), state);
        Ok(())
    }

    async fn delete_game_state(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        self.tables.write().await.game_states.remove(room_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RoomVisibility;
    use crate::domain::value_objects::RoomConfig;

    #[tokio::test]
    async fn round_trips_a_room() {
        let repo = InMemoryRoomRepository::new();
        let room = Room::new("ABC123".to_string(), RoomConfig::default(), RoomVisibility::Public, 0);
        repo.save_room(room.clone()).await.unwrap();
        let fetched = repo.find_room(&"ABC123".to_string()).await.unwrap();
        assert_eq!(fetched.unwrap().id, room.id);
    }

    #[tokio::test]
    async fn deleting_a_room_clears_its_game_state() {
        let repo = InMemoryRoomRepository::new();
        let room = Room::new("X".to_string(), RoomConfig::default(), RoomVisibility::Public, 0);
        repo.save_room(room).await.unwrap();
        let state = GameState::new(vec!["p1".to_string()], RoomConfig::default(), 0);
        repo.save_game_state(&"X".to_string(), state).await.unwrap();
        repo.delete_room(&"X".to_string()).await.unwrap();
        assert!(repo.find_room(&"X".to_string()).await.unwrap().is_none());
        assert!(repo.find_game_state(&"X".to_string()).await.unwrap().is_none());
    }
}
