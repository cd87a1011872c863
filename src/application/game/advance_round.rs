use std::sync::Arc;

use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::next_round_start_delay_ms;
use crate::domain::value_objects::GameState;

use super::start_round::deal_next_round;

/// Fired by the timer armed when a round ended and the match continues
/// (spec.md §4.2 Round end broadcast; SPEC_FULL.md §5 `start_round`).
/// `round` guards against a stale timer firing after `play_again` or a
/// second, faster-resolving round already moved the match on.
pub struct AdvanceRoundInput {
    pub room_id: String,
    pub round: u32,
}

pub enum AdvanceRoundOutcome {
    /// The round already moved on (or the match ended) before the timer fired.
    Stale,
    Applied { game: GameState, start_delay_ms: u64 },
}

/// Deal the next round once its display delay has elapsed.
pub struct AdvanceRound<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> AdvanceRound<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: AdvanceRoundInput) -> Result<AdvanceRoundOutcome, AdvanceRoundError> {
        let game = self
            .room_repo
            .find_game_state(&input.room_id)
            .await?
            .ok_or(AdvanceRoundError::NoGameInProgress)?;

        if game.game_ended || game.round != input.round {
            return Ok(AdvanceRoundOutcome::Stale);
        }

        let mut rng = rand::thread_rng();
        let next_game = deal_next_round(&game, &mut rng);
        let start_delay_ms = next_round_start_delay_ms(next_game.active_player_count());

        self.room_repo.save_game_state(&input.room_id, next_game.clone()).await?;

        Ok(AdvanceRoundOutcome::Applied { game: next_game, start_delay_ms })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvanceRoundError {
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
