use std::sync::Arc;

use crate::domain::entities::Room;
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::value_objects::GameState;

/// Get room state input (spec.md §6 `get_room_state { roomId }`,
/// request/response).
pub struct GetRoomStateInput {
    pub room_id: String,
}

pub struct GetRoomStateOutput {
    pub room: Room,
    pub game: Option<GameState>,
}

/// Fetch a room's current lobby and (if started) game state.
pub struct GetRoomState<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> GetRoomState<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: GetRoomStateInput) -> Result<GetRoomStateOutput, GetRoomStateError> {
        let room = self
            .room_repo
            .find_room(&input.room_id)
            .await?
            .ok_or(GetRoomStateError::RoomNotFound)?;
        let game = self.room_repo.find_game_state(&input.room_id).await?;
        Ok(GetRoomStateOutput { room, game })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetRoomStateError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
