//! Inbound commands the transport decodes off the wire and hands to the
//! core (spec.md §6). Each variant carries exactly the payload fields the
//! spec lists; the caller's `PlayerId` travels alongside the command
//! rather than inside it, since it is a transport-assigned, per-connection
//! identifier (spec.md §3), not something a client declares.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{BotDifficulty, Card};
use crate::domain::value_objects::RoomConfig;

/// Wire form of a turn action's draw-source choice (spec.md §9: a
/// discriminated union, not a bare string, at the core boundary).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "lowercase")]
pub enum TurnActionChoiceWire {
    Deck,
    Pickup { pickup_index: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum InboundCommand {
    CreateRoom { nick_name: String, avatar_index: u8, config: RoomConfig },
    JoinRoom { room_id: String, nick_name: String, avatar_index: u8 },
    QuickGame { nick_name: String, avatar_index: u8 },
    SetQuickGameConfig { room_id: String, config: RoomConfig },
    CreateBotRoom { nick_name: String, avatar_index: u8, config: RoomConfig, bot_difficulties: Vec<BotDifficulty> },
    LeaveRoom { is_admin: bool },
    StartPrivateGame { room_id: String },
    GetRoomState { room_id: String },
    CompleteTurn { room_id: String, action: TurnActionChoiceWire, selected_cards: Vec<Card> },
    CallYaniv { room_id: String },
    SlapDown { room_id: String, card: Card },
    PlayerWantsToPlayAgain,
}
