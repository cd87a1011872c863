//! Shared discard rule pipeline used by every bot difficulty (spec.md §4.3).
//!
//! Purely functional: takes a hand and the current pickup pile and returns
//! the cards to discard. Never touches `GameState` directly so it can be
//! re-entered by the one-ply look-ahead in `lookahead.rs`.

use crate::domain::entities::Card;
use crate::domain::services::combination::is_valid_set;

/// Governs how aggressively a bot is willing to synthesize a run using
/// jokers from its own hand (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokerPolicy {
    /// Never proposes a run candidate at all (easy).
    NoRuns,
    /// Considers runs, but rejects any that required a joker to complete (medium).
    RejectSynthesized,
    /// Considers runs that use at most one joker (hard).
    AllowOneJoker,
}

/// "Top" of the pickup pile for discard-policy purposes. The pile is
/// pickup-able from either end (spec.md §4.1 `canPickup`); the bot always
/// reasons about the last element as the reference point.
fn pickup_top(pickup_cards: &[Card]) -> Option<Card> {
    pickup_cards.last().copied()
}

/// All same-suit, ascending-rank subsets of `hand` of length >= 3 that form
/// a valid run, annotated with how many jokers they used.
fn runs_in_hand(hand: &[Card], policy: JokerPolicy) -> Vec<(Vec<Card>, usize)> {
    if policy == JokerPolicy::NoRuns {
        return Vec::new();
    }
    let max_jokers = match policy {
        JokerPolicy::NoRuns => return Vec::new(),
        JokerPolicy::RejectSynthesized => 0,
        JokerPolicy::AllowOneJoker => 1,
    };

    let jokers: Vec<Card> = hand.iter().copied().filter(|c| c.is_joker()).collect();
    let non_jokers: Vec<Card> = hand.iter().copied().filter(|c| !c.is_joker()).collect();

    let mut runs = Vec::new();
    for suit in crate::domain::entities::Suit::ALL {
        let same_suit: Vec<Card> = non_jokers.iter().copied().filter(|c| c.suit == suit).collect();
        if same_suit.is_empty() {
            continue;
        }
        for window_len in 3..=same_suit.len() + max_jokers.min(jokers.len()) {
            for combo in combinations(&same_suit, window_len.saturating_sub(0).min(same_suit.len())) {
                for joker_count in 0..=max_jokers.min(jokers.len()) {
                    if combo.len() + joker_count != window_len {
                        continue;
                    }
                    let mut candidate = combo.clone();
                    candidate.extend(jokers.iter().take(joker_count).copied());
                    if candidate.len() < 3 {
                        continue;
                    }
                    if is_valid_set(&candidate, false) {
                        runs.push((candidate, joker_count));
                    }
                }
            }
        }
    }
    runs
}

/// All subsets of `items` of size `k` (small hands only, fine to brute force).
fn combinations(items: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i]).collect());
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if indices[i] != i + items.len() - k {
                break;
            }
            if i == 0 {
                return result;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// Groups of hand cards sharing one rank, length >= 2, jokers excluded from
/// the anchor but counted as substitutes.
fn sets_in_hand(hand: &[Card]) -> Vec<Vec<Card>> {
    let mut by_rank: std::collections::HashMap<u8, Vec<Card>> = std::collections::HashMap::new();
    for card in hand.iter().filter(|c| !c.is_joker()) {
        by_rank.entry(card.rank).or_default().push(*card);
    }
    by_rank.into_values().filter(|group| group.len() >= 2).collect()
}

fn total_rank_value(cards: &[Card]) -> u32 {
    cards.iter().map(|c| c.rank as u32).sum()
}

/// Choose the cards to discard this turn (spec.md §4.3 `chooseCards`).
/// `policy` gates how the run-finding rules treat jokers; it is fixed per
/// bot difficulty.
pub fn choose_discard(hand: &[Card], pickup_cards: &[Card], policy: JokerPolicy) -> Vec<Card> {
    let top = pickup_top(pickup_cards);
    let runs = runs_in_hand(hand, policy);

    // Rule 1: protect a planned run - top + two hand cards could complete
    // a run of >= 3; keep those two, discard something that doesn't touch them.
    if let Some(top_card) = top {
        if !top_card.is_joker() {
            for pair in combinations(hand, 2) {
                let mut candidate = pair.clone();
                candidate.push(top_card);
                if is_valid_set(&candidate, false) {
                    if let Some(discard) = highest_rank_not_in(hand, &pair) {
                        return vec![discard];
                    }
                }
            }
        }
    }

    // Rule 2: take a free joker at the top - any safe discard works.
    if top.map(|c| c.is_joker()).unwrap_or(false) {
        if let Some(discard) = highest_rank_not_in(hand, &[]) {
            return vec![discard];
        }
    }

    // Rule 3: prefer discarding a long run already in hand.
    if let Some((best_run, _)) = runs
        .iter()
        .max_by_key(|(run, _)| (run.len(), total_rank_value(run)))
    {
        return best_run.clone();
    }

    // Rule 4: if the top extends an in-hand run, discard something unrelated.
    if let Some(top_card) = top {
        if !top_card.is_joker() {
            let extends = hand.iter().any(|c| {
                !c.is_joker() && c.suit == top_card.suit && (c.rank as i16 - top_card.rank as i16).abs() == 1
            });
            if extends {
                if let Some(discard) = hand
                    .iter()
                    .copied()
                    .filter(|c| !c.is_joker() && c.rank != top_card.rank)
                    .max_by_key(|c| c.rank)
                {
                    return vec![discard];
                }
            }
        }
    }

    // Rule 5: top completes an in-hand pair/set - keep it, discard another set or the highest loner.
    if let Some(top_card) = top {
        if !top_card.is_joker() && hand.iter().any(|c| !c.is_joker() && c.rank == top_card.rank) {
            let sets = sets_in_hand(hand);
            if let Some(other) = sets.iter().find(|s| s[0].rank != top_card.rank) {
                return other.clone();
            }
            if let Some(discard) = hand
                .iter()
                .copied()
                .filter(|c| !c.is_joker() && c.rank != top_card.rank)
                .max_by_key(|c| c.rank)
            {
                return vec![discard];
            }
        }
    }

    // Rule 6: low top value - shed a safe high card.
    if top.map(|c| c.point_value() <= 2).unwrap_or(false) {
        if let Some(discard) = highest_rank_not_in(hand, &[]) {
            return vec![discard];
        }
    }

    // Rule 7: prefer discarding the highest-value set, with the ace exception.
    let sets = sets_in_hand(hand);
    if let Some(best_set) = sets.iter().max_by_key(|s| total_rank_value(s)) {
        let is_all_aces = best_set.iter().all(|c| c.rank == 1);
        if is_all_aces {
            if let Some(single) = hand
                .iter()
                .copied()
                .filter(|c| !c.is_joker() && c.rank != 1)
                .max_by_key(|c| c.rank)
            {
                return vec![single];
            }
        }
        return best_set.clone();
    }

    // Rule 8: fallback - highest-rank non-joker.
    highest_rank_not_in(hand, &[]).into_iter().collect()
}

fn highest_rank_not_in(hand: &[Card], exclude: &[Card]) -> Option<Card> {
    hand.iter()
        .copied()
        .filter(|c| !c.is_joker() && !exclude.contains(c))
        .max_by_key(|c| c.rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Suit;

    fn c(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn fallback_discards_highest_rank() {
        let hand = vec![c(Suit::Hearts, 3), c(Suit::Clubs, 12), c(Suit::Diamonds, 9)];
        let pickup = vec![c(Suit::Spades, 5)];
        let discard = choose_discard(&hand, &pickup, JokerPolicy::NoRuns);
        assert_eq!(discard, vec![c(Suit::Clubs, 12)]);
    }

    #[test]
    fn prefers_long_run_in_hand() {
        let hand = vec![
            c(Suit::Hearts, 3),
            c(Suit::Hearts, 4),
            c(Suit::Hearts, 5),
            c(Suit::Clubs, 9),
        ];
        let pickup = vec![c(Suit::Spades, 2)];
        let discard = choose_discard(&hand, &pickup, JokerPolicy::RejectSynthesized);
        assert_eq!(discard.len(), 3);
    }

    #[test]
    fn ace_exception_avoids_discarding_ace_set() {
        let hand = vec![c(Suit::Hearts, 1), c(Suit::Clubs, 1), c(Suit::Diamonds, 11)];
        let pickup = vec![c(Suit::Spades, 7)];
        let discard = choose_discard(&hand, &pickup, JokerPolicy::NoRuns);
        assert_eq!(discard, vec![c(Suit::Diamonds, 11)]);
    }
}
