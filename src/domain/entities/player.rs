use serde::{Deserialize, Serialize};

/// Stable per-connection identifier. Bots get a synthetic id.
pub type PlayerId = String;

/// Bot difficulty levels, gating joker usage in the discard policy and the
/// aggressiveness of the pickup look-ahead (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
}

impl BotDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotDifficulty::Easy => "easy",
            BotDifficulty::Medium => "medium",
            BotDifficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(BotDifficulty::Easy),
            "medium" => Some(BotDifficulty::Medium),
            "hard" => Some(BotDifficulty::Hard),
            _ => None,
        }
    }
}

/// A seat at a room: either a connected human or a bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub nick_name: String,
    pub avatar_index: u8,
    pub is_bot: bool,
    pub difficulty: Option<BotDifficulty>,
}

impl Player {
    pub fn human(id: PlayerId, nick_name: String, avatar_index: u8) -> Self {
        Self {
            id,
            nick_name,
            avatar_index,
            is_bot: false,
            difficulty: None,
        }
    }

    pub fn bot(id: PlayerId, nick_name: String, avatar_index: u8, difficulty: BotDifficulty) -> Self {
        Self {
            id,
            nick_name,
            avatar_index,
            is_bot: true,
            difficulty: Some(difficulty),
        }
    }
}

/// Per-player status tracked inside a running game (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerStatus {
    Active,
    Lost,
    Winner,
    PlayAgain,
    Leave,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Active => "active",
            PlayerStatus::Lost => "lost",
            PlayerStatus::Winner => "winner",
            PlayerStatus::PlayAgain => "playAgain",
            PlayerStatus::Leave => "leave",
        }
    }
}

/// A player's status entry as broadcast in `playersStats` (status + the
/// display fields the client needs alongside it).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatusEntry {
    pub status: PlayerStatus,
    pub score: i64,
    pub player_name: String,
    pub avatar_index: u8,
}

impl PlayerStatusEntry {
    pub fn new(player: &Player) -> Self {
        Self {
            status: PlayerStatus::Active,
            score: 0,
            player_name: player.nick_name.clone(),
            avatar_index: player.avatar_index,
        }
    }
}
