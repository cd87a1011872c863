use std::sync::Arc;

use crate::domain::entities::{Room, RoomPhase};
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::first_round_start_delay_ms;
use crate::domain::value_objects::GameState;

use crate::application::game::deal_first_round;

/// Start private game input (spec.md §6 `start_private_game { roomId }`).
pub struct StartPrivateGameInput {
    pub player_id: String,
    pub room_id: String,
}

pub struct StartPrivateGameOutput {
    pub room: Room,
    pub game: GameState,
    /// Delay before the deal is revealed and the first turn timer arms
    /// (spec.md §4.2 Deal).
    pub start_delay_ms: u64,
}

/// Transition a private, waiting room to `started` and deal the first
/// round (spec.md §4.2/§4.4).
pub struct StartPrivateGame<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> StartPrivateGame<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(
        &self,
        input: StartPrivateGameInput,
    ) -> Result<StartPrivateGameOutput, StartPrivateGameError> {
        let mut room = self
            .room_repo
            .find_room(&input.room_id)
            .await?
            .ok_or(StartPrivateGameError::RoomNotFound)?;

        if room.owner_id.as_deref() != Some(input.player_id.as_str()) {
            return Err(StartPrivateGameError::NotOwner);
        }
        if room.game_state != RoomPhase::Waiting {
            return Err(StartPrivateGameError::AlreadyStarted);
        }
        if room.players.is_empty() {
            return Err(StartPrivateGameError::NotEnoughPlayers);
        }

        let mut rng = rand::thread_rng();
        let game = deal_first_round(&room.players, room.config, &mut rng);
        let start_delay_ms = first_round_start_delay_ms(game.active_player_count());

        room.game_state = RoomPhase::Started;
        let room_for_event = room.clone();
        self.room_repo.save_room(room).await?;
        self.room_repo.save_game_state(&input.room_id, game.clone()).await?;

        Ok(StartPrivateGameOutput { room: room_for_event, game, start_delay_ms })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartPrivateGameError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Only the room owner can start the game")]
    NotOwner,
    #[error("Room already started")]
    AlreadyStarted,
    #[error("Not enough players")]
    NotEnoughPlayers,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
