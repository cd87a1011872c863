use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerId};
use crate::domain::value_objects::RoomConfig;

/// Stable 6-character alphanumeric room code.
pub type RoomId = String;

/// Maximum seats per room. Not stated by spec.md; adopted from the closest
/// sibling system in this codebase family (its `Party::is_full` caps a
/// party at 8), since the bot engine and hand layout need *some* bound.
pub const MAX_PLAYERS: usize = 8;

/// How a room was created, governing whether it participates in the
/// staged quick-game start timer and config voting (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomVisibility {
    Public,
    Private,
}

/// Room lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    Waiting,
    Started,
}

/// A room: a lobby of players plus whatever config they've agreed (or are
/// voting) on. `GameState` (in `value_objects`) is created separately once
/// the room transitions to `Started` and persists across rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub players: Vec<Player>,
    pub config: RoomConfig,
    pub visibility: RoomVisibility,
    /// Per-player config votes, keyed by nickname (spec.md §3: `map<playerName, RoomConfig>`).
    pub votes: HashMap<String, RoomConfig>,
    pub game_state: RoomPhase,
    pub created_at: i64,
    /// The player whose departure triggers ownership rotation (spec.md §9
    /// design note on the `isAdmin` leave-room field). Not part of spec.md's
    /// §3 data model; a supplement needed to give `leave_room{isAdmin}` a
    /// concrete effect.
    pub owner_id: Option<PlayerId>,
}

impl Room {
    pub fn new(id: RoomId, config: RoomConfig, visibility: RoomVisibility, created_at: i64) -> Self {
        Self {
            id,
            players: Vec::new(),
            config,
            visibility,
            votes: HashMap::new(),
            game_state: RoomPhase::Waiting,
            created_at,
            owner_id: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn find_player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn remove_player(&mut self, player_id: &str) -> Option<Player> {
        let idx = self.player_index(player_id)?;
        let removed = self.players.remove(idx);
        self.votes.remove(&removed.nick_name);
        Some(removed)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Sample a fresh 6-character alphanumeric room code.
pub fn generate_room_code(rng: &mut impl rand::RngCore) -> RoomId {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ0123456789";
    (0..6)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
