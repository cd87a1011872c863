use std::sync::Arc;

use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::turn_engine::{execute_turn_action, forced_timeout_action, TurnResult};

/// Turn timeout input, fired by the per-turn timer armed when the turn
/// started (spec.md §4.2 Turn timeout, §9 Timers). `generation` guards
/// against a stale timer firing after the turn already advanced.
pub struct TurnTimeoutInput {
    pub room_id: String,
    pub generation: u64,
}

pub enum TurnTimeoutOutcome {
    /// The timer fired for a turn that has already moved on; no-op.
    Stale,
    Applied(TurnResult),
}

/// Force the current player's turn: discard their single highest-rank
/// card, draw from the deck, with slap-down disabled (spec.md §4.2).
pub struct TurnTimeout<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> TurnTimeout<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: TurnTimeoutInput) -> Result<TurnTimeoutOutcome, TurnTimeoutError> {
        let mut game = self
            .room_repo
            .find_game_state(&input.room_id)
            .await?
            .ok_or(TurnTimeoutError::NoGameInProgress)?;

        if game.game_ended || game.turn_generation != input.generation {
            return Ok(TurnTimeoutOutcome::Stale);
        }

        let current = game.current_player_id().clone();
        let hand = game.hand_of(&current).to_vec();
        if hand.is_empty() {
            return Ok(TurnTimeoutOutcome::Stale);
        }
        let action = forced_timeout_action(&hand);

        let mut rng = rand::thread_rng();
        let result = execute_turn_action(&mut game, &current, action, &mut rng, true)
            .expect("a forced single-card discard from the player's own hand is always valid");

        self.room_repo.save_game_state(&input.room_id, game).await?;
        Ok(TurnTimeoutOutcome::Applied(result))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TurnTimeoutError {
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
