use async_trait::async_trait;

use crate::domain::entities::{Room, RoomId};
use crate::domain::value_objects::GameState;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
}

/// Storage seam for rooms and their in-progress game state. The in-memory
/// adapter under `infrastructure` is the only implementation this core
/// ships; persistence is explicitly out of scope (spec.md §1).
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_room(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// A waiting, non-full public room, for `quick_game` to join instead of
    /// opening a new one (spec.md §4.4). `None` means a fresh room should be
    /// created. Which waiting room is returned when several qualify is
    /// unspecified by spec.md; this core returns an arbitrary one.
    async fn find_open_public_room(&self) -> Result<Option<Room>, RepositoryError>;

    async fn save_room(&self, room: Room) -> Result<(), RepositoryError>;

    async fn delete_room(&self, id: &RoomId) -> Result<(), RepositoryError>;

    /// Resolve which room (if any) a player currently occupies.
    async fn find_room_for_player(&self, player_id: &str) -> Result<Option<RoomId>, RepositoryError>;

    async fn set_player_room(&self, player_id: &str, room_id: RoomId) -> Result<(), RepositoryError>;

    async fn clear_player_room(&self, player_id: &str) -> Result<(), RepositoryError>;

    async fn find_game_state(&self, room_id: &RoomId) -> Result<Option<GameState>, RepositoryError>;

    async fn save_game_state(&self, room_id: &RoomId, state: GameState) -> Result<(), RepositoryError>;

    async fn delete_game_state(&self, room_id: &RoomId) -> Result<(), RepositoryError>;
}
