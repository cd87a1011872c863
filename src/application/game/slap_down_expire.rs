use std::sync::Arc;

use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::expire_slap_down;

/// Slap-down window expiry input, fired by the timer armed when the window
/// opened (spec.md §9 Timers). `generation` guards against a stale timer.
pub struct SlapDownExpireInput {
    pub room_id: String,
    pub generation: u64,
}

/// Close an armed slap-down window once its timer elapses, if no later
/// event has already superseded it.
pub struct SlapDownExpire<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> SlapDownExpire<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn execute(&self, input: SlapDownExpireInput) -> Result<(), SlapDownExpireError> {
        let mut game = self
            .room_repo
            .find_game_state(&input.room_id)
            .await?
            .ok_or(SlapDownExpireError::NoGameInProgress)?;

        expire_slap_down(&mut game, input.generation);

        self.room_repo.save_game_state(&input.room_id, game).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SlapDownExpireError {
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
