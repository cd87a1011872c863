use std::sync::Arc;

use crate::domain::entities::PlayerId;
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::turn_engine::{execute_turn_action, TurnAction, TurnError, TurnResult};

/// Complete turn input (spec.md §6 `complete_turn { roomId, selectedCards,
/// selectedPickupIndex }`).
pub struct CompleteTurnInput {
    pub player_id: PlayerId,
    pub room_id: String,
    pub action: TurnAction,
}

/// Validate turn ownership, then apply a player's chosen action through the
/// shared turn engine (spec.md §4.2).
pub struct CompleteTurn<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> CompleteTurn<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: CompleteTurnInput) -> Result<TurnResult, CompleteTurnError> {
        let mut game = self
            .room_repo
            .find_game_state(&input.room_id)
            .await?
            .ok_or(CompleteTurnError::NoGameInProgress)?;

        if game.game_ended {
            return Err(CompleteTurnError::GameEnded);
        }
        if game.current_player_id() != &input.player_id {
            return Err(CompleteTurnError::Turn(TurnError::NotYourTurn));
        }

        let mut rng = rand::thread_rng();
        let result = execute_turn_action(&mut game, &input.player_id, input.action, &mut rng, false)
            .map_err(CompleteTurnError::Turn)?;

        self.room_repo.save_game_state(&input.room_id, game).await?;
        Ok(result)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompleteTurnError {
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("The match has already ended")]
    GameEnded,
    #[error("Turn error: {0:?}")]
    Turn(TurnError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
