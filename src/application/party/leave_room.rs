use std::sync::Arc;

use crate::domain::entities::{PlayerId, PlayerStatus, Room, RoomPhase};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::value_objects::{quick_game_start_delay_seconds, GameState};

/// Leave room input (spec.md §6 `leave_room { nickName, isAdmin }`).
/// `player_id` identifies who is leaving; `is_admin` is the client's claim
/// that it held room ownership (spec.md §9 design note, §4.2 supplement).
pub struct LeaveRoomInput {
    pub player_id: PlayerId,
    pub is_admin: bool,
}

pub enum LeaveRoomOutcome {
    /// The room still has occupants.
    RoomUpdated {
        room: Room,
        /// Re-evaluated staged start timer for a waiting public room.
        start_delay_seconds: Option<u64>,
        /// Set when the departure ended the match (spec.md §4.4: "if only
        /// one non-{lost,leave} player remains, end the match"); carries
        /// the final `GameState` so the caller can compose `places`
        /// (spec.md §4.2) the same way a Yaniv-triggered match end does.
        match_ended: Option<GameState>,
    },
    /// The room is now empty and was destroyed.
    RoomDestroyed { room_id: String },
}

/// Remove a player from their room, re-evaluate matchmaking timers, and
/// resolve a mid-match departure (spec.md §4.4 Leave/disconnect).
pub struct LeaveRoom<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> LeaveRoom<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: LeaveRoomInput) -> Result<LeaveRoomOutcome, LeaveRoomError> {
        let room_id = self
            .room_repo
            .find_room_for_player(&input.player_id)
            .await?
            .ok_or(LeaveRoomError::NotInRoom)?;
        let mut room = self
            .room_repo
            .find_room(&room_id)
            .await?
            .ok_or(LeaveRoomError::NotInRoom)?;

        let was_owner = room.owner_id.as_deref() == Some(input.player_id.as_str());
        room.remove_player(&input.player_id);
        self.room_repo.clear_player_room(&input.player_id).await?;

        if room.is_empty() {
            self.room_repo.delete_room(&room_id).await?;
            self.room_repo.delete_game_state(&room_id).await?;
            return Ok(LeaveRoomOutcome::RoomDestroyed { room_id });
        }

        if was_owner && input.is_admin {
            room.owner_id = room.players.first().map(|p| p.id.clone());
        }

        let mut match_ended = None;
        if room.game_state == RoomPhase::Started {
            if let Some(mut game) = self.room_repo.find_game_state(&room_id).await? {
                if resolve_mid_match_departure(&mut game, &input.player_id).is_some() {
                    match_ended = Some(game.clone());
                }
                self.room_repo.save_game_state(&room_id, game).await?;
            }
        }

        let start_delay_seconds = if room.game_state == RoomPhase::Waiting {
            quick_game_start_delay_seconds(room.players.len())
        } else {
            None
        };

        self.room_repo.save_room(room.clone()).await?;

        Ok(LeaveRoomOutcome::RoomUpdated {
            room,
            start_delay_seconds,
            match_ended,
        })
    }
}

/// Mark the departing player `leave`, and end the match if at most one
/// non-{lost,leave} player remains (spec.md §4.4).
fn resolve_mid_match_departure(game: &mut GameState, player_id: &str) -> Option<PlayerId> {
    if let Some(entry) = game.players_stats.get_mut(player_id) {
        entry.status = PlayerStatus::Leave;
    }
    game.player_hands.remove(player_id);

    let remaining: Vec<PlayerId> = game
        .players_stats
        .iter()
        .filter(|(_, s)| s.status == PlayerStatus::Active)
        .map(|(id, _)| id.clone())
        .collect();

    if remaining.len() > 1 || game.game_ended {
        return None;
    }

    game.game_ended = true;
    let winner = remaining.into_iter().next();
    if let Some(w) = &winner {
        game.winner = Some(w.clone());
        if let Some(entry) = game.players_stats.get_mut(w) {
            entry.status = PlayerStatus::Winner;
        }
    }
    winner
}

#[derive(Debug, thiserror::Error)]
pub enum LeaveRoomError {
    #[error("Player is not in a room")]
    NotInRoom,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
