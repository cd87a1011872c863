//! Per-room game state: the turn machine's mutable core (spec.md §3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Card, PlayerId, PlayerStatusEntry};
use crate::domain::value_objects::RoomConfig;

/// A snapshot of the slap-down window: armed for exactly one player, who
/// drew `card` and may shed it onto the pile within the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlapDownWindow {
    pub player_id: PlayerId,
    pub card: Card,
    /// Generation counter; a timer firing for a stale generation is a no-op.
    pub generation: u64,
}

/// Per-room game state, created when a room transitions to `started` and
/// persisting across rounds until the match ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player_order: Vec<PlayerId>,
    pub current_player_index: usize,

    /// Draw stack; the top of the deck is the *last* element (LIFO).
    pub deck: Vec<Card>,
    /// The most recently played set, pickup-able from either end.
    pub pickup_cards: Vec<Card>,
    /// Every set `pickup_cards` has been overwritten with, minus whatever
    /// was picked back up off it — buried discards, unseen until the deck
    /// empties and they are reshuffled back in (spec.md §4.2 Deck reshuffle,
    /// §8.1 Conservation).
    pub graveyard: Vec<Card>,
    pub player_hands: HashMap<PlayerId, Vec<Card>>,
    pub players_stats: HashMap<PlayerId, PlayerStatusEntry>,
    /// Elimination order, earliest-eliminated first.
    pub players_loser_order: Vec<PlayerId>,

    pub round: u32,
    pub turn_start_time: i64,
    pub game_start_time: i64,

    // Config snapshot, copied from RoomConfig at game start.
    pub time_per_player: u32,
    pub can_call_yaniv: u32,
    pub max_match_points: u32,
    pub slap_down: bool,

    pub slap_down_window: Option<SlapDownWindow>,

    pub game_ended: bool,
    pub winner: Option<PlayerId>,

    /// Bumped every time the current player changes; guards the turn timer
    /// against firing for a turn that has already advanced (spec.md §5/§9).
    pub turn_generation: u64,
}

impl GameState {
    pub fn new(player_order: Vec<PlayerId>, config: RoomConfig, now: i64) -> Self {
        Self {
            player_order,
            current_player_index: 0,
            deck: Vec::new(),
            pickup_cards: Vec::new(),
            graveyard: Vec::new(),
            player_hands: HashMap::new(),
            players_stats: HashMap::new(),
            players_loser_order: Vec::new(),
            round: 0,
            turn_start_time: now,
            game_start_time: now,
            time_per_player: config.time_per_player,
            can_call_yaniv: config.can_call_yaniv,
            max_match_points: config.max_match_points,
            slap_down: config.slap_down,
            slap_down_window: None,
            game_ended: false,
            winner: None,
            turn_generation: 0,
        }
    }

    pub fn current_player_id(&self) -> &PlayerId {
        &self.player_order[self.current_player_index]
    }

    pub fn active_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.player_order.iter().filter(move |p| {
            self.players_stats
                .get(*p)
                .map(|s| s.status == crate::domain::entities::PlayerStatus::Active)
                .unwrap_or(false)
        })
    }

    pub fn active_player_count(&self) -> usize {
        self.active_players().count()
    }

    pub fn is_active(&self, player_id: &str) -> bool {
        self.players_stats
            .get(player_id)
            .map(|s| s.status == crate::domain::entities::PlayerStatus::Active)
            .unwrap_or(false)
    }

    /// Advance `current_player_index` to the next active player, cyclically.
    pub fn advance_turn(&mut self) {
        let n = self.player_order.len();
        if n == 0 {
            return;
        }
        for step in 1..=n {
            let next = (self.current_player_index + step) % n;
            if self.is_active(&self.player_order[next]) {
                self.current_player_index = next;
                self.turn_generation += 1;
                return;
            }
        }
    }

    pub fn hand_of(&self, player_id: &str) -> &[Card] {
        self.player_hands
            .get(player_id)
            .map(|h| h.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PlayerStatus, Suit};

    fn make_state(players: &[&str]) -> GameState {
        let mut state = GameState::new(
            players.iter().map(|p| p.to_string()).collect(),
            RoomConfig::default(),
            0,
        );
        for p in players {
            state.players_stats.insert(
                p.to_string(),
                PlayerStatusEntry {
                    status: PlayerStatus::Active,
                    score: 0,
                    player_name: p.to_string(),
                    avatar_index: 0,
                },
            );
            state.player_hands.insert(p.to_string(), vec![]);
        }
        state
    }

    #[test]
    fn advance_turn_skips_eliminated() {
        let mut state = make_state(&["a", "b", "c"]);
        state
            .players_stats
            .get_mut("b")
            .unwrap()
            .status = PlayerStatus::Lost;
        state.current_player_index = 0;
        state.advance_turn();
        assert_eq!(state.current_player_id(), "c");
        state.advance_turn();
        assert_eq!(state.current_player_id(), "a");
    }

    #[test]
    fn hand_of_unknown_player_is_empty() {
        let state = make_state(&["a"]);
        assert!(state.hand_of("ghost").is_empty());
        let _ = Suit::Spades;
    }
}
