use std::sync::Arc;

use crate::domain::entities::{Card, PlayerId};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::turn_engine::{resolve_slap_down, TurnError, TurnResult};

/// Slap down input (spec.md §6 `slap_down { roomId, card }`).
pub struct SlapDownInput {
    pub player_id: PlayerId,
    pub room_id: String,
    pub card: Card,
}

/// Shed a just-drawn card onto either end of the pickup pile within the
/// armed slap-down window (spec.md §4.1/§4.2).
pub struct SlapDown<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> SlapDown<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: SlapDownInput) -> Result<TurnResult, SlapDownError> {
        let mut game = self
            .room_repo
            .find_game_state(&input.room_id)
            .await?
            .ok_or(SlapDownError::NoGameInProgress)?;

        if game.game_ended {
            return Err(SlapDownError::GameEnded);
        }

        let result =
            resolve_slap_down(&mut game, &input.player_id, input.card).map_err(SlapDownError::Turn)?;

        self.room_repo.save_game_state(&input.room_id, game).await?;
        Ok(result)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SlapDownError {
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("The match has already ended")]
    GameEnded,
    #[error("Turn error: {0:?}")]
    Turn(TurnError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
