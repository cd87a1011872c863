use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{generate_room_code, BotDifficulty, Player, PlayerId, Room, RoomId, RoomVisibility, MAX_PLAYERS};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::value_objects::RoomConfig;

use super::common::leave_prior_room;
use crate::application::time::now_millis;

/// Create bot room input (spec.md §6
/// `create_bot_room { nickName, config }`, "bot seats auto-filled").
pub struct CreateBotRoomInput {
    pub player_id: PlayerId,
    pub nick_name: String,
    pub avatar_index: u8,
    pub config: RoomConfig,
    /// One difficulty per bot seat to fill, in order. Truncated to
    /// `MAX_PLAYERS - 1` if it would overflow the room.
    pub bot_difficulties: Vec<BotDifficulty>,
}

pub struct CreateBotRoomOutput {
    pub room: Room,
}

/// Create a private room seated with the creator plus bots at the
/// requested difficulties (spec.md §4.4).
pub struct CreateBotRoom<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> CreateBotRoom<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: CreateBotRoomInput) -> Result<CreateBotRoomOutput, CreateBotRoomError> {
        if input.nick_name.trim().is_empty() {
            return Err(CreateBotRoomError::Validation("Nickname is required".into()));
        }

        leave_prior_room(self.room_repo.as_ref(), &input.player_id).await?;

        let room_id = self.fresh_room_code().await?;
        let mut room = Room::new(room_id, input.config, RoomVisibility::Private, now_millis());
        room.owner_id = Some(input.player_id.clone());
        room.players
            .push(Player::human(input.player_id.clone(), input.nick_name, input.avatar_index));

        let bot_seats = (MAX_PLAYERS - room.players.len()).min(input.bot_difficulties.len());
        for (i, difficulty) in input.bot_difficulties.into_iter().take(bot_seats).enumerate() {
            let bot_id = format!("bot-{}", Uuid::new_v4());
            let bot_name = format!("Bot {}", i + 1);
            room.players.push(Player::bot(bot_id, bot_name, 0, difficulty));
        }

        self.room_repo.save_room(room.clone()).await?;
        self.room_repo
            .set_player_room(&input.player_id, room.id.clone())
            .await?;

        Ok(CreateBotRoomOutput { room })
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
pub enum CreateBotRoomError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
