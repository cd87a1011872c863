use std::sync::Arc;

use crate::domain::entities::{generate_room_code, Player, PlayerId, Room, RoomId, RoomVisibility};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::value_objects::{quick_game_start_delay_seconds, RoomConfig};

use super::common::leave_prior_room;
use crate::application::time::now_millis;

/// Quick game input (spec.md §6 `quick_game { nickName }`).
pub struct QuickGameInput {
    pub player_id: PlayerId,
    pub nick_name: String,
    pub avatar_index: u8,
}

pub struct QuickGameOutput {
    pub room: Room,
    /// Seconds until the staged start timer fires, or `None` if the
    /// current player count doesn't arm one (spec.md §4.4).
    pub start_delay_seconds: Option<u64>,
}

/// Join an open public room, or open a fresh one, then (re)compute the
/// staged quick-game start timer for the resulting player count.
pub struct QuickGame<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> QuickGame<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: QuickGameInput) -> Result<QuickGameOutput, QuickGameError> {
        if input.nick_name.trim().is_empty() {
            return Err(QuickGameError::Validation("Nickname is required".into()));
        }

        leave_prior_room(self.room_repo.as_ref(), &input.player_id).await?;

        let mut room = match self.room_repo.find_open_public_room().await? {
            Some(room) => room,
            None => {
                let room_id = self.fresh_room_code().await?;
                Room::new(room_id, RoomConfig::default(), RoomVisibility::Public, now_millis())
            }
        };

        room.players
            .push(Player::human(input.player_id.clone(), input.nick_name, input.avatar_index));
        self.room_repo.save_room(room.clone()).await?;
        self.room_repo
            .set_player_room(&input.player_id, room.id.clone())
            .await?;

        let start_delay_seconds = quick_game_start_delay_seconds(room.players.len());
        Ok(QuickGameOutput { room, start_delay_seconds })
    }

    async fn fresh_room_code(&self) -> Result<RoomId, RepositoryError> {
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let candidate = generate_room_code(&mut rng);
            if self.room_repo.find_room(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(RepositoryError::AlreadyExists("room code space exhausted".into()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuickGameError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
