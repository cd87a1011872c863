//! Deal orchestration: build the `GameState` for the first round of a
//! match, or for a subsequent round that carries scores forward
//! (spec.md §4.2 Deal).

use rand::Rng;

use crate::domain::entities::{Player, PlayerId, PlayerStatus, PlayerStatusEntry};
use crate::domain::services::{deal_hands, shuffle_new_deck};
use crate::domain::value_objects::{GameState, RoomConfig};

use crate::application::time::now_millis;

/// Start a brand-new match: every seated player is active with score 0,
/// round 1.
pub fn deal_first_round(players: &[Player], config: RoomConfig, rng: &mut impl Rng) -> GameState {
    let player_order: Vec<PlayerId> = players.iter().map(|p| p.id.clone()).collect();
    let now = now_millis();
    let mut game = GameState::new(player_order.clone(), config, now);
    game.round = 1;

    for player in players {
        game.players_stats
            .insert(player.id.clone(), PlayerStatusEntry::new(player));
    }

    let (mut deck, pickup_cards) = shuffle_new_deck(rng);
    let hands = deal_hands(&mut deck, &player_order);
    game.deck = deck;
    game.pickup_cards = pickup_cards;
    game.player_hands = hands;
    game.turn_start_time = now;
    game
}

/// Start the round after `round_ended`: active players keep their scores
/// and get a fresh hand; eliminated/left players keep their final status
/// and have no hand (spec.md §3 invariants).
pub fn deal_next_round(previous: &GameState, rng: &mut impl Rng) -> GameState {
    let now = now_millis();
    let active_order: Vec<PlayerId> = previous
        .player_order
        .iter()
        .filter(|id| previous.is_active(id))
        .cloned()
        .collect();

    let mut game = GameState::new(active_order.clone(), RoomConfig {
        slap_down: previous.slap_down,
        time_per_player: previous.time_per_player,
        can_call_yaniv: previous.can_call_yaniv,
        max_match_points: previous.max_match_points,
    }, now);
    game.round = previous.round + 1;
    game.game_start_time = previous.game_start_time;
    game.players_stats = previous.players_stats.clone();
    game.players_loser_order = previous.players_loser_order.clone();

    let (mut deck, pickup_cards) = shuffle_new_deck(rng);
    let hands = deal_hands(&mut deck, &active_order);
    game.deck = deck;
    game.pickup_cards = pickup_cards;
    game.player_hands = hands;
    game.turn_start_time = now;
    game
}

/// Active players who are neither active-only-in-name nor holding a hand
/// after a round transition are a data-model bug; this assertion-style
/// helper is used by tests driving §8 property 1 (conservation).
pub fn active_player_ids(game: &GameState) -> Vec<PlayerId> {
    game.players_stats
        .iter()
        .filter(|(_, s)| s.status == PlayerStatus::Active)
        .map(|(id, _)| id.clone())
        .collect()
}
