//! Dealing, deck reshuffling, and round/match timing (spec.md §4.2).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entities::{canonical_deck, Card, PlayerId};

/// Cards dealt to each active player at the start of a round (spec.md §6).
pub const HAND_SIZE: usize = 5;

/// A freshly shuffled deck with the first card popped off as the opening
/// pickup pile (spec.md §4.2 Deal). Returns `(deck, pickup_cards)`.
pub fn shuffle_new_deck(rng: &mut impl Rng) -> (Vec<Card>, Vec<Card>) {
    let mut deck = canonical_deck();
    deck.shuffle(rng);
    let first = deck.pop().expect("canonical deck is never empty");
    (deck, vec![first])
}

/// Deal `HAND_SIZE` cards to each of `players` by popping from the top of
/// `deck` (the end of the vec, LIFO).
pub fn deal_hands(deck: &mut Vec<Card>, players: &[PlayerId]) -> std::collections::HashMap<PlayerId, Vec<Card>> {
    let mut hands = std::collections::HashMap::new();
    for pid in players {
        let mut hand = Vec::with_capacity(HAND_SIZE);
        for _ in 0..HAND_SIZE {
            if let Some(card) = deck.pop() {
                hand.push(card);
            }
        }
        crate::domain::entities::sort_hand(&mut hand);
        hands.insert(pid.clone(), hand);
    }
    hands
}

/// Reshuffle when the draw deck empties mid-round (spec.md §4.2 Deck
/// reshuffle): the deck becomes a uniformly shuffled permutation of every
/// card buried in `graveyard` — every set a turn has replaced `pickup_cards`
/// with, minus whatever was picked back up, accumulates there across the
/// round (§3/§8.1 Conservation) rather than vanishing with the pile it was
/// overwritten from. `graveyard` is left empty.
pub fn reshuffle_deck(graveyard: &mut Vec<Card>, rng: &mut impl Rng) -> Vec<Card> {
    let mut refilled = std::mem::take(graveyard);
    refilled.shuffle(rng);
    refilled
}

/// Delay before the first round's cards are revealed and the first turn
/// timer arms (spec.md §4.2 Deal): `2100 + 500*N` ms.
pub fn first_round_start_delay_ms(active_player_count: usize) -> u64 {
    2100 + 500 * active_player_count as u64
}

/// Delay before a subsequent round starts after `round_ended` (spec.md §4.2
/// Deal): `2600 + 700*N` ms.
pub fn next_round_start_delay_ms(active_player_count: usize) -> u64 {
    2600 + 700 * active_player_count as u64
}

/// Delay before advancing past the round-end display, with an additional
/// pause if the round produced eliminations (spec.md §4.2 Round end
/// broadcast): `2000*activeCount - 1` ms, plus `3250` ms if anyone was
/// eliminated this round.
pub fn round_result_delay_ms(active_player_count: usize, had_eliminations: bool) -> u64 {
    let base = (2000 * active_player_count as i64 - 1).max(0) as u64;
    if had_eliminations {
        base + 3250
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn deal_conserves_cards_s1() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (mut deck, pickup) = shuffle_new_deck(&mut rng);
        assert_eq!(deck.len() + pickup.len(), 54);
        let players = vec!["p1".to_string(), "p2".to_string()];
        let hands = deal_hands(&mut deck, &players);
        let total: usize = hands.values().map(|h| h.len()).sum::<usize>() + deck.len() + pickup.len();
        assert_eq!(total, 54);
        assert_eq!(hands["p1"].len(), HAND_SIZE);
    }

    #[test]
    fn reshuffle_drains_the_graveyard() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut graveyard = vec![
            Card::new(crate::domain::entities::Suit::Hearts, 5),
            Card::new(crate::domain::entities::Suit::Hearts, 6),
            Card::new(crate::domain::entities::Suit::Hearts, 7),
        ];
        let reshuffled = reshuffle_deck(&mut graveyard, &mut rng);
        assert!(graveyard.is_empty());
        assert_eq!(reshuffled.len(), 3);
    }

    #[test]
    fn delay_functions_are_linear() {
        assert_eq!(first_round_start_delay_ms(2), 3100);
        assert_eq!(next_round_start_delay_ms(2), 4000);
        assert_eq!(round_result_delay_ms(2, false), 3999);
        assert_eq!(round_result_delay_ms(2, true), 3999 + 3250);
    }
}
