//! One-ply simulated look-ahead for the pickup decision (spec.md §4.3
//! `decidePickupIndex`). Purely functional: never touches `GameState`.

use crate::domain::entities::{hand_value, Card};
use crate::domain::services::combination::is_valid_set;

use super::discard_policy::{choose_discard, JokerPolicy};

/// A candidate the bot is weighing: pick up one edge of the pile, or skip
/// and draw from the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupCandidate {
    Edge(usize),
    Skip,
}

fn has_three_run(hand: &[Card]) -> bool {
    for a in hand {
        for b in hand {
            for c in hand {
                if a == b || b == c || a == c {
                    continue;
                }
                if is_valid_set(&[*a, *b, *c], false) {
                    return true;
                }
            }
        }
    }
    false
}

fn same_rank_group_sizes(hand: &[Card]) -> Vec<usize> {
    let mut by_rank = std::collections::HashMap::new();
    for card in hand.iter().filter(|c| !c.is_joker()) {
        *by_rank.entry(card.rank).or_insert(0usize) += 1;
    }
    by_rank.into_values().collect()
}

/// Score one candidate by simulating the turn it would produce: the hand
/// after taking the card and discarding per the policy's next move.
fn score_candidate(
    hand: &[Card],
    pickup_cards: &[Card],
    picked: Option<Card>,
    policy: JokerPolicy,
    hard_joker_connectivity: bool,
) -> i64 {
    let mut simulated_hand = hand.to_vec();
    if let Some(card) = picked {
        simulated_hand.push(card);
    }

    // The inner discard call sees the picked card (or, on skip, nothing new)
    // as the sole pickup pile so its rules treat it as "the top" (spec.md §9).
    let simulated_pickup = picked.map(|c| vec![c]).unwrap_or_default();
    let planned_discard = choose_discard(&simulated_hand, &simulated_pickup, policy);

    let mut resulting_hand = simulated_hand.clone();
    for card in &planned_discard {
        if let Some(pos) = resulting_hand.iter().position(|c| c == card) {
            resulting_hand.remove(pos);
        }
    }

    let mut score: i64 = 1000 - hand_value(&resulting_hand) as i64;

    let picked_breaks_run = picked
        .map(|card| !planned_discard.is_empty() && !planned_discard.contains(&card) && {
            let mut with_card = resulting_hand.clone();
            with_card.push(card);
            has_three_run(&with_card) && !has_three_run(&resulting_hand)
        })
        .unwrap_or(false);

    if let Some(card) = picked {
        let mut trial = resulting_hand.clone();
        trial.push(card);
        if has_three_run(&trial) {
            score += 120;
        }
        if picked_breaks_run {
            score -= 200;
        }
    }

    for group_len in same_rank_group_sizes(&resulting_hand) {
        if group_len >= 3 {
            score += 90;
        } else if group_len == 2 {
            score += 40;
        }
    }

    if let Some(card) = picked {
        let completes_run_now = !has_three_run(hand) && {
            let mut with_card = hand.to_vec();
            with_card.push(card);
            has_three_run(&with_card)
        };
        if completes_run_now {
            let discard_breaks_it = planned_discard.iter().any(|d| *d == card);
            if !discard_breaks_it {
                score += 800;
            } else {
                score -= 600;
            }
        }

        let completes_pair = hand.iter().any(|c| !c.is_joker() && !card.is_joker() && c.rank == card.rank);
        let discard_has_same_rank = planned_discard.iter().any(|d| !d.is_joker() && !card.is_joker() && d.rank == card.rank);
        if completes_pair && discard_has_same_rank {
            score -= 10_000;
        }

        if card.point_value() <= 2 {
            score += 300; // base low-card bonus; connectivity adds more below
            let adjacency = |target_rank: i16| {
                hand.iter().any(|c| !c.is_joker() && c.suit == card.suit && c.rank as i16 == target_rank)
            };
            if card.rank == 1 && adjacency(2) {
                score += 220;
            }
            if adjacency(card.rank as i16 + 2) {
                score += 180;
            }
            let has_joker_in_hand = hand.iter().any(|c| c.is_joker());
            if card.rank == 1 && adjacency(3) && (adjacency(2) || (hard_joker_connectivity && has_joker_in_hand)) {
                score += 160;
            }
        }
    }

    let _ = pickup_cards;
    score
}

/// Choose which pickup-pile edge to take (or skip), per the one-ply
/// look-ahead scoring in spec.md §4.3. A joker at an eligible edge is
/// always taken.
pub fn decide_pickup(
    hand: &[Card],
    pickup_cards: &[Card],
    policy: JokerPolicy,
    hard_joker_connectivity: bool,
) -> PickupCandidate {
    if pickup_cards.is_empty() {
        return PickupCandidate::Skip;
    }

    let mut edges = vec![0usize];
    if pickup_cards.len() > 1 {
        edges.push(pickup_cards.len() - 1);
    }

    for &edge in &edges {
        if pickup_cards[edge].is_joker() {
            return PickupCandidate::Edge(edge);
        }
    }

    let mut best = PickupCandidate::Skip;
    let mut best_score = score_candidate(hand, pickup_cards, None, policy, hard_joker_connectivity);

    for &edge in &edges {
        let candidate_score = score_candidate(
            hand,
            pickup_cards,
            Some(pickup_cards[edge]),
            policy,
            hard_joker_connectivity,
        );
        if candidate_score > best_score {
            best_score = candidate_score;
            best = PickupCandidate::Edge(edge);
        }
    }

    best
}

/// A bot calls Yaniv whenever its hand value is at or below the room's
/// threshold (spec.md §4.3: "Always call Yaniv automatically").
pub fn should_call_yaniv(hand: &[Card], can_call_yaniv: u32) -> bool {
    hand_value(hand) <= can_call_yaniv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Suit;

    fn c(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn always_takes_joker_at_edge() {
        let hand = vec![c(Suit::Hearts, 9)];
        let pickup = vec![Card::joker(Suit::Spades), c(Suit::Clubs, 4)];
        assert_eq!(
            decide_pickup(&hand, &pickup, JokerPolicy::NoRuns, false),
            PickupCandidate::Edge(0)
        );
    }

    #[test]
    fn calls_yaniv_within_threshold() {
        let hand = vec![c(Suit::Hearts, 3), c(Suit::Clubs, 2)];
        assert!(should_call_yaniv(&hand, 7));
        let high_hand = vec![c(Suit::Hearts, 10), c(Suit::Clubs, 10)];
        assert!(!should_call_yaniv(&high_hand, 7));
    }

    #[test]
    fn skip_when_pickup_offers_nothing_useful() {
        let hand = vec![c(Suit::Hearts, 2), c(Suit::Clubs, 3)];
        let pickup = vec![c(Suit::Diamonds, 12)];
        let decision = decide_pickup(&hand, &pickup, JokerPolicy::NoRuns, false);
        // A lone high off-suit card should not outscore skipping.
        assert_eq!(decision, PickupCandidate::Skip);
    }
}
