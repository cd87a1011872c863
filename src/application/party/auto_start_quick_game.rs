use std::sync::Arc;

use crate::domain::entities::{Room, RoomPhase, RoomVisibility};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::first_round_start_delay_ms;
use crate::domain::value_objects::{resolve_majority_vote, GameState};

use crate::application::game::deal_first_round;

/// Fired by the staged start timer armed after `quick_game`/`join_room`
/// leave a public room still waiting with at least two seats filled
/// (spec.md §4.4; SPEC_FULL.md §5 `start_game_quick`). `seats_at_arm_time`
/// guards against a stale timer firing after the roster changed again.
pub struct AutoStartQuickGameInput {
    pub room_id: String,
    pub seats_at_arm_time: usize,
}

pub enum AutoStartQuickGameOutcome {
    /// The roster moved on (someone joined/left, or the room already
    /// started) since the timer was armed.
    Stale,
    Started { room: Room, game: GameState, start_delay_ms: u64 },
}

/// Deal the first round for a public room once its staged start timer
/// elapses, without requiring an owner's `start_private_game` (spec.md
/// §4.4: quick-game rooms start themselves).
pub struct AutoStartQuickGame<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> AutoStartQuickGame<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(
        &self,
        input: AutoStartQuickGameInput,
    ) -> Result<AutoStartQuickGameOutcome, AutoStartQuickGameError> {
        let mut room = self
            .room_repo
            .find_room(&input.room_id)
            .await?
            .ok_or(AutoStartQuickGameError::RoomNotFound)?;

        if room.game_state != RoomPhase::Waiting
            || room.visibility != RoomVisibility::Public
            || room.players.len() != input.seats_at_arm_time
        {
            return Ok(AutoStartQuickGameOutcome::Stale);
        }

        // Majority vote per field across every submitted config, falling
        // back to the default on any field without a strict majority
        // (spec.md §4.4 "On expiry, the final config is chosen by majority
        // vote per field").
        let votes: Vec<_> = room.votes.values().copied().collect();
        room.config = resolve_majority_vote(&votes);

        let mut rng = rand::thread_rng();
        let game = deal_first_round(&room.players, room.config, &mut rng);
        let start_delay_ms = first_round_start_delay_ms(game.active_player_count());

        room.game_state = RoomPhase::Started;
        room.votes.clear();
        let room_for_event = room.clone();
        self.room_repo.save_room(room).await?;
        self.room_repo.save_game_state(&input.room_id, game.clone()).await?;

        Ok(AutoStartQuickGameOutcome::Started { room: room_for_event, game, start_delay_ms })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AutoStartQuickGameError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
