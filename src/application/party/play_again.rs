use std::sync::Arc;

use crate::domain::entities::{Player, PlayerId, PlayerStatus, Room};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::first_round_start_delay_ms;
use crate::domain::value_objects::GameState;

use crate::application::game::deal_first_round;

/// Play-again input (spec.md §6 `player_wants_to_play_again { playerId }`).
pub struct PlayAgainInput {
    pub player_id: PlayerId,
}

pub enum PlayAgainOutcome {
    /// Not everyone has voted yet; just records the vote.
    Waiting { room: Room },
    /// Every remaining (non-leave) player voted `playAgain` and there were
    /// at least two of them: a new match starts (spec.md §3 Lifecycle).
    NewMatch {
        room: Room,
        game: GameState,
        start_delay_ms: u64,
    },
}

/// Record a post-round "play again" vote and, once unanimous among at
/// least two remaining players, start a fresh match (spec.md §3/§4.4).
pub struct PlayAgain<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> PlayAgain<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: PlayAgainInput) -> Result<PlayAgainOutcome, PlayAgainError> {
        let room_id = self
            .room_repo
            .find_room_for_player(&input.player_id)
            .await?
            .ok_or(PlayAgainError::NotInRoom)?;
        let room = self
            .room_repo
            .find_room(&room_id)
            .await?
            .ok_or(PlayAgainError::NotInRoom)?;

        let mut game = self
            .room_repo
            .find_game_state(&room_id)
            .await?
            .ok_or(PlayAgainError::NoGameInProgress)?;
        if !game.game_ended {
            return Err(PlayAgainError::GameNotEnded);
        }

        if let Some(entry) = game.players_stats.get_mut(&input.player_id) {
            entry.status = PlayerStatus::PlayAgain;
        } else {
            return Err(PlayAgainError::NotInRoom);
        }

        let remaining: Vec<&PlayerId> = game
            .players_stats
            .iter()
            .filter(|(_, s)| s.status != PlayerStatus::Leave)
            .map(|(id, _)| id)
            .collect();
        let voted: usize = remaining
            .iter()
            .filter(|id| {
                game.players_stats
                    .get(**id)
                    .map(|s| s.status == PlayerStatus::PlayAgain)
                    .unwrap_or(false)
            })
            .count();

        if voted < 2 || voted != remaining.len() {
            self.room_repo.save_game_state(&room_id, game).await?;
            return Ok(PlayAgainOutcome::Waiting { room });
        }

        let continuing: Vec<Player> = room
            .players
            .iter()
            .filter(|p| remaining.iter().any(|id| *id == &p.id))
            .cloned()
            .collect();

        let mut rng = rand::thread_rng();
        let new_game = deal_first_round(&continuing, room.config, &mut rng);
        let start_delay_ms = first_round_start_delay_ms(new_game.active_player_count());

        self.room_repo
            .save_game_state(&room_id, new_game.clone())
            .await?;

        Ok(PlayAgainOutcome::NewMatch {
            room,
            game: new_game,
            start_delay_ms,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlayAgainError {
    #[error("Player is not in a room")]
    NotInRoom,
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("The current match has not ended yet")]
    GameNotEnded,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
