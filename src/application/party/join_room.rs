use std::sync::Arc;

use crate::domain::entities::{Player, PlayerId, Room, RoomPhase};
use crate::domain::repositories::{RepositoryError, RoomRepository};

use super::common::leave_prior_room;

/// Join room input (spec.md §6 `join_room { roomId, nickName }`).
pub struct JoinRoomInput {
    pub player_id: PlayerId,
    pub room_id: String,
    pub nick_name: String,
    pub avatar_index: u8,
}

pub struct JoinRoomOutput {
    pub room: Room,
}

/// Join an existing, waiting, non-full room.
pub struct JoinRoom<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> JoinRoom<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: JoinRoomInput) -> Result<JoinRoomOutput, JoinRoomError> {
        if input.nick_name.trim().is_empty() {
            return Err(JoinRoomError::Validation("Nickname is required".into()));
        }

        let mut room = self
            .room_repo
            .find_room(&input.room_id)
            .await?
            .ok_or(JoinRoomError::RoomNotFound)?;

        if room.game_state != RoomPhase::Waiting {
            return Err(JoinRoomError::AlreadyStarted);
        }
        if room.is_full() {
            return Err(JoinRoomError::RoomFull);
        }

        leave_prior_room(self.room_repo.as_ref(), &input.player_id).await?;

        room.players
            .push(Player::human(input.player_id.clone(), input.nick_name, input.avatar_index));
        self.room_repo.save_room(room.clone()).await?;
        self.room_repo
            .set_player_room(&input.player_id, room.id.clone())
            .await?;

        Ok(JoinRoomOutput { room })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinRoomError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Room not found")]
    RoomNotFound,
    #[error("Room already started")]
    AlreadyStarted,
    #[error("Room is full")]
    RoomFull,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
