//! The per-room turn loop: validating and applying a player's action,
//! turn timeouts, and slap-down resolution (spec.md §4.2).

use rand::Rng;

use crate::domain::entities::{sort_hand, Card, PlayerId};
use crate::domain::services::combination::{
    can_pickup, find_sequence_arrangement, is_valid_set, slap_down_valid_from, SlapSide,
};
use crate::domain::services::deal::reshuffle_deck;
use crate::domain::value_objects::{GameState, SlapDownWindow};

/// What a player chose to do with their `selectedCards` this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnChoice {
    Deck,
    Pickup { pickup_index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAction {
    pub selected_cards: Vec<Card>,
    pub choice: TurnChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    NotYourTurn,
    InvalidSelection,
    InvalidPickupIndex,
    CardsNotInHand,
}

/// Where the drawn card came from, for the `player_drew` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    Deck,
    Pickup,
    Slap,
}

/// Everything an outbound `player_drew` event needs.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub player_id: PlayerId,
    pub source: DrawSource,
    pub selected_cards_positions: Vec<usize>,
    pub amount_before: usize,
    pub drawn_card: Option<Card>,
    pub new_pickup_cards: Vec<Card>,
    pub next_current_player_id: PlayerId,
    pub slap_down_active_for: Option<PlayerId>,
    pub deck_reshuffled: bool,
    /// Every active player's hand size after this action, keyed by id
    /// (spec.md §6 `player_drew { hands, ... }`) — sizes only, since a
    /// player's own cards are the only hand a client may see in full.
    pub hand_sizes: std::collections::HashMap<PlayerId, usize>,
}

/// Apply a validated turn action for `player_id`, mutating `game` in place.
/// Does not check whose turn it is — callers must confirm
/// `game.current_player_id() == player_id` before invoking this.
pub fn execute_turn_action(
    game: &mut GameState,
    player_id: &str,
    action: TurnAction,
    rng: &mut impl Rng,
    disable_slap_down: bool,
) -> Result<TurnResult, TurnError> {
    if !is_valid_set(&action.selected_cards, true) {
        return Err(TurnError::InvalidSelection);
    }

    let hand = game
        .player_hands
        .get(player_id)
        .ok_or(TurnError::CardsNotInHand)?
        .clone();
    let amount_before = hand.len();
    let positions = positions_in_hand(&hand, &action.selected_cards)?;

    let arranged = find_sequence_arrangement(&action.selected_cards).ok_or(TurnError::InvalidSelection)?;

    let mut new_hand = hand.clone();
    remove_positions(&mut new_hand, &positions);

    let pickup_index_used: Option<usize> = match &action.choice {
        TurnChoice::Pickup { pickup_index } => Some(*pickup_index),
        TurnChoice::Deck => None,
    };

    let mut deck_reshuffled = false;
    let (drawn, source, slap_window, new_pickup) = match action.choice {
        TurnChoice::Deck => {
            if game.deck.is_empty() {
                let refilled = reshuffle_deck(&mut game.graveyard, rng);
                game.deck = refilled;
                deck_reshuffled = true;
            }
            let drawn = game.deck.pop();
            let slap_window = match drawn {
                Some(card) if !disable_slap_down && game.slap_down && !card.is_joker() => {
                    match slap_down_valid_from(&arranged, card) {
                        SlapSide::None => None,
                        _ => {
                            game.turn_generation += 1;
                            Some(SlapDownWindow {
                                player_id: player_id.to_string(),
                                card,
                                generation: game.turn_generation,
                            })
                        }
                    }
                }
                _ => None,
            };
            (drawn, DrawSource::Deck, slap_window, arranged.clone())
        }
        TurnChoice::Pickup { pickup_index } => {
            if !can_pickup(game.pickup_cards.len(), pickup_index) {
                return Err(TurnError::InvalidPickupIndex);
            }
            let drawn = game.pickup_cards[pickup_index];
            (Some(drawn), DrawSource::Pickup, None, arranged.clone())
        }
    };

    if let Some(card) = drawn {
        new_hand.push(card);
    }
    sort_hand(&mut new_hand);

    game.player_hands.insert(player_id.to_string(), new_hand);

    // Bury the pile this turn is about to overwrite: all of it for a deck
    // draw (the pile went untouched), all but the card just taken for a
    // pickup. Nothing a player doesn't hold may disappear (§8.1 Conservation).
    let mut buried = std::mem::take(&mut game.pickup_cards);
    if let Some(idx) = pickup_index_used {
        buried.remove(idx);
    }
    game.graveyard.extend(buried);

    game.pickup_cards = new_pickup.clone();
    game.slap_down_window = slap_window.clone();
    game.advance_turn();

    Ok(TurnResult {
        player_id: player_id.to_string(),
        source,
        selected_cards_positions: positions,
        amount_before,
        drawn_card: drawn,
        new_pickup_cards: new_pickup,
        next_current_player_id: game.current_player_id().clone(),
        slap_down_active_for: slap_window.map(|w| w.player_id),
        deck_reshuffled,
        hand_sizes: hand_sizes(game),
    })
}

/// Every active player's current hand size, for the `player_drew` broadcast.
fn hand_sizes(game: &GameState) -> std::collections::HashMap<PlayerId, usize> {
    game.player_hands.iter().map(|(pid, hand)| (pid.clone(), hand.len())).collect()
}

/// Build the forced `TurnAction` for a player whose turn timer expired:
/// discard the single highest-rank card in hand, draw from the deck, with
/// slap-down disabled (spec.md §4.2 Turn timeout).
pub fn forced_timeout_action(hand: &[Card]) -> TurnAction {
    let highest = hand
        .iter()
        .copied()
        .max_by_key(|c| c.rank)
        .expect("timeout fires only for a player with a non-empty hand");
    TurnAction {
        selected_cards: vec![highest],
        choice: TurnChoice::Deck,
    }
}

/// Resolve a slap-down attempt against the currently armed window. Returns
/// `Err` if no window is armed, it belongs to another player, or the
/// generation has moved on (a late timer fire, or the window already
/// consumed by a prior command).
pub fn resolve_slap_down(
    game: &mut GameState,
    player_id: &str,
    card: Card,
) -> Result<TurnResult, TurnError> {
    let window = game
        .slap_down_window
        .clone()
        .filter(|w| w.player_id == player_id && w.card == card)
        .ok_or(TurnError::InvalidSelection)?;

    let side = slap_down_valid_from(&game.pickup_cards, card);
    if side == SlapSide::None {
        return Err(TurnError::InvalidSelection);
    }

    let hand = game
        .player_hands
        .get_mut(player_id)
        .ok_or(TurnError::CardsNotInHand)?;
    let pos = hand
        .iter()
        .position(|c| *c == card)
        .ok_or(TurnError::CardsNotInHand)?;
    hand.remove(pos);

    match side {
        SlapSide::Left => game.pickup_cards.insert(0, card),
        SlapSide::Right => game.pickup_cards.push(card),
        SlapSide::None => unreachable!(),
    }
    let amount_before = hand.len() + 1;

    game.slap_down_window = None;
    let _ = window;

    Ok(TurnResult {
        player_id: player_id.to_string(),
        source: DrawSource::Slap,
        selected_cards_positions: vec![pos],
        amount_before,
        drawn_card: Some(card),
        new_pickup_cards: game.pickup_cards.clone(),
        next_current_player_id: game.current_player_id().clone(),
        slap_down_active_for: None,
        deck_reshuffled: false,
        hand_sizes: hand_sizes(game),
    })
}

/// Expire an armed slap-down window if `generation` still matches (a
/// no-op for a stale timer firing after the window was already consumed
/// or advanced past, spec.md §9 Timers).
pub fn expire_slap_down(game: &mut GameState, generation: u64) {
    if let Some(window) = &game.slap_down_window {
        if window.generation == generation {
            game.slap_down_window = None;
        }
    }
}

fn positions_in_hand(hand: &[Card], selected: &[Card]) -> Result<Vec<usize>, TurnError> {
    let mut remaining: Vec<usize> = (0..hand.len()).collect();
    let mut positions = Vec::with_capacity(selected.len());
    for card in selected {
        let idx_in_remaining = remaining
            .iter()
            .position(|&i| hand[i] == *card)
            .ok_or(TurnError::CardsNotInHand)?;
        positions.push(remaining.remove(idx_in_remaining));
    }
    Ok(positions)
}

fn remove_positions(hand: &mut Vec<Card>, positions: &[usize]) {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    for pos in sorted {
        hand.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PlayerStatus, PlayerStatusEntry, Suit};
    use crate::domain::value_objects::RoomConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn c(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    fn setup_game() -> GameState {
        let mut game = GameState::new(vec!["p1".to_string(), "p2".to_string()], RoomConfig::default(), 0);
        for p in ["p1", "p2"] {
            game.players_stats.insert(
                p.to_string(),
                PlayerStatusEntry {
                    status: PlayerStatus::Active,
                    score: 0,
                    player_name: p.to_string(),
                    avatar_index: 0,
                },
            );
        }
        game.player_hands.insert(
            "p1".to_string(),
            vec![c(Suit::Hearts, 3), c(Suit::Hearts, 4), c(Suit::Hearts, 5), c(Suit::Clubs, 7), c(Suit::Diamonds, 9)],
        );
        game.player_hands.insert("p2".to_string(), vec![]);
        game.pickup_cards = vec![c(Suit::Hearts, 6)];
        game.deck = vec![c(Suit::Spades, 2)];
        game
    }

    #[test]
    fn run_pickup_s2() {
        let mut game = setup_game();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let action = TurnAction {
            selected_cards: vec![c(Suit::Hearts, 3), c(Suit::Hearts, 4), c(Suit::Hearts, 5)],
            choice: TurnChoice::Pickup { pickup_index: 0 },
        };
        let result = execute_turn_action(&mut game, "p1", action, &mut rng, false).unwrap();
        assert_eq!(result.new_pickup_cards, vec![c(Suit::Hearts, 3), c(Suit::Hearts, 4), c(Suit::Hearts, 5)]);
        let new_hand = &game.player_hands["p1"];
        assert!(new_hand.contains(&c(Suit::Hearts, 6)));
        assert!(new_hand.contains(&c(Suit::Clubs, 7)));
        assert!(new_hand.contains(&c(Suit::Diamonds, 9)));
        assert_eq!(new_hand.len(), 3);
    }

    #[test]
    fn deck_draw_arms_slap_down_window() {
        let mut game = setup_game();
        game.deck = vec![c(Suit::Diamonds, 8)];
        game.pickup_cards = vec![c(Suit::Diamonds, 5), c(Suit::Diamonds, 6), c(Suit::Diamonds, 7)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let action = TurnAction {
            selected_cards: vec![c(Suit::Hearts, 3), c(Suit::Hearts, 4), c(Suit::Hearts, 5)],
            choice: TurnChoice::Deck,
        };
        let result = execute_turn_action(&mut game, "p1", action, &mut rng, false).unwrap();
        assert_eq!(result.drawn_card, Some(c(Suit::Diamonds, 8)));
        assert_eq!(game.slap_down_window.as_ref().unwrap().card, c(Suit::Diamonds, 8));
    }

    #[test]
    fn forced_timeout_picks_highest_rank() {
        let hand = vec![c(Suit::Hearts, 3), c(Suit::Clubs, 13), c(Suit::Diamonds, 9)];
        let action = forced_timeout_action(&hand);
        assert_eq!(action.selected_cards, vec![c(Suit::Clubs, 13)]);
        assert_eq!(action.choice, TurnChoice::Deck);
    }

    #[test]
    fn slap_down_extends_pile_s4() {
        let mut game = setup_game();
        game.pickup_cards = vec![c(Suit::Clubs, 5), c(Suit::Clubs, 6), c(Suit::Clubs, 7)];
        game.player_hands.insert("p2".to_string(), vec![c(Suit::Clubs, 8)]);
        game.slap_down_window = Some(SlapDownWindow {
            player_id: "p2".to_string(),
            card: c(Suit::Clubs, 8),
            generation: 1,
        });
        let result = resolve_slap_down(&mut game, "p2", c(Suit::Clubs, 8)).unwrap();
        assert_eq!(result.new_pickup_cards, vec![c(Suit::Clubs, 5), c(Suit::Clubs, 6), c(Suit::Clubs, 7), c(Suit::Clubs, 8)]);
        assert!(game.player_hands["p2"].is_empty());
        assert!(game.slap_down_window.is_none());
    }

    #[test]
    fn expire_slap_down_is_noop_for_stale_generation() {
        let mut game = setup_game();
        game.slap_down_window = Some(SlapDownWindow {
            player_id: "p2".to_string(),
            card: c(Suit::Clubs, 8),
            generation: 5,
        });
        expire_slap_down(&mut game, 4);
        assert!(game.slap_down_window.is_some());
        expire_slap_down(&mut game, 5);
        assert!(game.slap_down_window.is_none());
    }
}
