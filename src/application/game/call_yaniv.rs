use std::sync::Arc;

use crate::domain::entities::{PlayerId, PlayerStatus};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::{
    append_losers_deterministically, apply_round_score, resolve_yaniv, resolve_zero_active_winner,
    round_result_delay_ms, YanivError, YanivOutcome,
};
use crate::domain::value_objects::GameState;

/// Call Yaniv input (spec.md §6 `call_yaniv { roomId }`).
pub struct CallYanivInput {
    pub player_id: PlayerId,
    pub room_id: String,
}

/// One player's round-end score change, for the `round_ended` broadcast.
pub struct PlayerRoundDelta {
    pub player_id: PlayerId,
    pub added: i64,
    pub new_score: i64,
    pub bonus_reduction_applied: bool,
    pub newly_eliminated: bool,
}

pub struct CallYanivOutput {
    pub outcome: YanivOutcome,
    pub deltas: Vec<PlayerRoundDelta>,
    pub game: GameState,
    /// Delay before the round-end display advances (spec.md §4.2 Round
    /// end broadcast).
    pub round_result_delay_ms: u64,
    /// Set once the match has ended (one active player remains).
    pub match_winner: Option<PlayerId>,
}

/// Resolve a Yaniv call against every other active player's hand, score the
/// round, and eliminate anyone now above `max_match_points`. If the match
/// continues, the next round's deal is deferred to the `start_round` timer
/// (spec.md §4.2 Round end broadcast: "schedule the next round after a
/// display delay") so the final hands stay visible for `round_result_delay_ms`.
pub struct CallYaniv<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> CallYaniv<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: CallYanivInput) -> Result<CallYanivOutput, CallYanivError> {
        let mut game = self
            .room_repo
            .find_game_state(&input.room_id)
            .await?
            .ok_or(CallYanivError::NoGameInProgress)?;

        if game.game_ended {
            return Err(CallYanivError::GameEnded);
        }
        if game.current_player_id() != &input.player_id {
            return Err(CallYanivError::NotYourTurn);
        }

        let outcome = resolve_yaniv(&game, &input.player_id)?;

        let active: Vec<PlayerId> = game.active_players().cloned().collect();
        let mut deltas = Vec::with_capacity(active.len());
        let mut newly_eliminated = Vec::new();

        for pid in &active {
            let hand = game.hand_of(pid).to_vec();
            let previous_score = game.players_stats[pid].score;
            let delta = apply_round_score(
                previous_score,
                &hand,
                outcome.assaf_caller.as_deref() == Some(pid.as_str()),
                &outcome.winner == pid,
                game.max_match_points,
            );

            let entry = game.players_stats.get_mut(pid).expect("active player has a stats entry");
            entry.score = delta.new_score;
            if delta.newly_eliminated {
                entry.status = PlayerStatus::Lost;
                newly_eliminated.push(pid.clone());
            }

            deltas.push(PlayerRoundDelta {
                player_id: pid.clone(),
                added: delta.added,
                new_score: delta.new_score,
                bonus_reduction_applied: delta.bonus_reduction_applied,
                newly_eliminated: delta.newly_eliminated,
            });
        }

        append_losers_deterministically(&mut game.players_loser_order, newly_eliminated);

        let remaining_active: Vec<PlayerId> = game.active_players().cloned().collect();
        let had_eliminations = deltas.iter().any(|d| d.newly_eliminated);
        let delay = round_result_delay_ms(active.len(), had_eliminations);

        let match_winner = match remaining_active.len() {
            0 => {
                let candidates: Vec<(PlayerId, i64)> = deltas
                    .iter()
                    .map(|d| (d.player_id.clone(), d.new_score))
                    .collect();
                resolve_zero_active_winner(&candidates, outcome.assaf_caller.as_ref())
            }
            1 => Some(remaining_active[0].clone()),
            _ => None,
        };

        if let Some(winner) = &match_winner {
            game.game_ended = true;
            game.winner = Some(winner.clone());
            if let Some(entry) = game.players_stats.get_mut(winner) {
                entry.status = PlayerStatus::Winner;
            }
        }
        self.room_repo.save_game_state(&input.room_id, game.clone()).await?;

        Ok(CallYanivOutput {
            outcome,
            deltas,
            game,
            round_result_delay_ms: delay,
            match_winner,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallYanivError {
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("The match has already ended")]
    GameEnded,
    #[error("It is not this player's turn")]
    NotYourTurn,
    #[error("Cannot call Yaniv with {value} points. Maximum is {max}.")]
    HandTooHigh { value: u32, max: u32 },
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<YanivError> for CallYanivError {
    fn from(err: YanivError) -> Self {
        match err {
            YanivError::HandTooHigh { value, max } => CallYanivError::HandTooHigh { value, max },
        }
    }
}
