mod game_state;
mod room_config;

pub use game_state::{GameState, SlapDownWindow};
pub use room_config::{quick_game_start_delay_seconds, resolve_majority_vote, RoomConfig};
