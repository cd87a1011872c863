//! Shared helpers used by several room-lifecycle use cases.

use crate::domain::entities::PlayerId;
use crate::domain::repositories::{RepositoryError, RoomRepository};

/// Enforce the "at most one room per player" invariant (spec.md §3): if
/// `player_id` already occupies a room, remove them from it before they
/// join or create another.
pub(crate) async fn leave_prior_room<R: RoomRepository>(
    room_repo: &R,
    player_id: &PlayerId,
) -> Result<(), RepositoryError> {
    if let Some(prior_id) = room_repo.find_room_for_player(player_id).await? {
        if let Some(mut prior_room) = room_repo.find_room(&prior_id).await? {
            prior_room.remove_player(player_id);
            if prior_room.is_empty() {
                room_repo.delete_room(&prior_id).await?;
            } else {
                room_repo.save_room(prior_room).await?;
            }
        }
        room_repo.clear_player_room(player_id).await?;
    }
    Ok(())
}
