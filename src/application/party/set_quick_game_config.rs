use std::sync::Arc;

use crate::domain::entities::{PlayerId, Room, RoomPhase};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::value_objects::RoomConfig;

/// Set quick game config input (spec.md §6
/// `set_quick_game_config { roomId, nickName, config }`): one player's vote
/// for the room's eventual config.
pub struct SetQuickGameConfigInput {
    pub player_id: PlayerId,
    pub room_id: String,
    pub config: RoomConfig,
}

pub struct SetQuickGameConfigOutput {
    pub room: Room,
}

/// Record or replace a player's config vote in a waiting public room
/// (spec.md §4.4). The majority resolution itself runs when the staged
/// start timer expires (`StartGameQuick`, see `start_room.rs`).
pub struct SetQuickGameConfig<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> SetQuickGameConfig<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(
        &self,
        input: SetQuickGameConfigInput,
    ) -> Result<SetQuickGameConfigOutput, SetQuickGameConfigError> {
        let mut room = self
            .room_repo
            .find_room(&input.room_id)
            .await?
            .ok_or(SetQuickGameConfigError::RoomNotFound)?;

        if room.game_state != RoomPhase::Waiting {
            return Err(SetQuickGameConfigError::AlreadyStarted);
        }

        let player = room
            .find_player(&input.player_id)
            .ok_or(SetQuickGameConfigError::NotInRoom)?;
        let nick_name = player.nick_name.clone();

        room.votes.insert(nick_name, input.config);
        self.room_repo.save_room(room.clone()).await?;

        Ok(SetQuickGameConfigOutput { room })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetQuickGameConfigError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Room already started")]
    AlreadyStarted,
    #[error("Player is not in this room")]
    NotInRoom,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
