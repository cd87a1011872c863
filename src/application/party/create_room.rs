use std::sync::Arc;

use crate::domain::entities::{generate_room_code, Player, PlayerId, Room, RoomId, RoomVisibility};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::value_objects::RoomConfig;

use crate::application::time::now_millis;

/// Create room input (spec.md §6 `create_room { nickName, config }`).
/// `player_id` is the caller's stable per-connection identifier (spec.md
/// §3), assigned by the transport, not minted here.
pub struct CreateRoomInput {
    pub player_id: PlayerId,
    pub nick_name: String,
    pub avatar_index: u8,
    pub config: RoomConfig,
}

/// Create room output, enough for the `room_created` broadcast.
pub struct CreateRoomOutput {
    pub room: Room,
}

/// Create a private room, owned by its creator, whose config is fixed by
/// the creator rather than voted on (spec.md §4.4).
pub struct CreateRoom<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> CreateRoom<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: CreateRoomInput) -> Result<CreateRoomOutput, CreateRoomError> {
        if input.nick_name.trim().is_empty() {
            return Err(CreateRoomError::Validation("Nickname is required".into()));
        }

        super::common::leave_prior_room(self.room_repo.as_ref(), &input.player_id).await?;

        let room_id = self.fresh_room_code().await?;
        let mut room = Room::new(room_id, input.config, RoomVisibility::Private, now_millis());
        room.owner_id = Some(input.player_id.clone());
        room.players
            .push(Player::human(input.player_id.clone(), input.nick_name, input.avatar_index));

        self.room_repo.save_room(room.clone()).await?;
        self.room_repo
            .set_player_room(&input.player_id, room.id.clone())
            .await?;

        Ok(CreateRoomOutput { room })
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
pub enum CreateRoomError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
