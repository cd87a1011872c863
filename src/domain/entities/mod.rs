mod card;
mod player;
mod room;

pub use card::{canonical_deck, hand_value, sort_hand, Card, Suit};
pub use player::{BotDifficulty, Player, PlayerId, PlayerStatus, PlayerStatusEntry};
pub use room::{generate_room_code, Room, RoomId, RoomPhase, RoomVisibility, MAX_PLAYERS};
