//! Card model: suits, ranks, jokers and point values.

use serde::{Deserialize, Serialize};

/// The four standard suits. Ordering here is the fixed tiebreak order used
/// when sorting hands: spades, hearts, diamonds, clubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "spades" => Some(Suit::Spades),
            "hearts" => Some(Suit::Hearts),
            "diamonds" => Some(Suit::Diamonds),
            "clubs" => Some(Suit::Clubs),
            _ => None,
        }
    }

    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

/// A single playing card. `rank == 0` denotes a joker; the suit on a joker
/// only distinguishes the two physical jokers and is never consulted by
/// the combination rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
}

impl Card {
    pub const JOKER_RANK: u8 = 0;

    pub fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    pub fn joker(suit: Suit) -> Self {
        Self {
            suit,
            rank: Self::JOKER_RANK,
        }
    }

    #[inline]
    pub fn is_joker(&self) -> bool {
        self.rank == Self::JOKER_RANK
    }

    /// Point value: joker=0, ace=1, 2..10=face value, J/Q/K=10.
    pub fn point_value(&self) -> u8 {
        match self.rank {
            0 => 0,
            1..=10 => self.rank,
            11..=13 => 10,
            _ => 0,
        }
    }
}

/// Sort a hand ascending by rank, ties broken by the fixed suit order.
pub fn sort_hand(hand: &mut [Card]) {
    hand.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.suit.cmp(&b.suit)));
}

/// Build the canonical 54-card deck: 52 standard cards + 2 jokers.
pub fn canonical_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(54);
    for suit in Suit::ALL {
        for rank in 1..=13u8 {
            cards.push(Card::new(suit, rank));
        }
    }
    cards.push(Card::joker(Suit::Spades));
    cards.push(Card::joker(Suit::Hearts));
    cards
}

/// Sum of point values in a hand.
pub fn hand_value(hand: &[Card]) -> u32 {
    hand.iter().map(|c| c.point_value() as u32).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_has_54_unique_cards() {
        let deck = canonical_deck();
        assert_eq!(deck.len(), 54);
        let unique: std::collections::HashSet<_> = deck.iter().collect();
        assert_eq!(unique.len(), 54);
    }

    #[test]
    fn point_values() {
        assert_eq!(Card::joker(Suit::Spades).point_value(), 0);
        assert_eq!(Card::new(Suit::Hearts, 1).point_value(), 1);
        assert_eq!(Card::new(Suit::Hearts, 7).point_value(), 7);
        assert_eq!(Card::new(Suit::Hearts, 11).point_value(), 10);
        assert_eq!(Card::new(Suit::Hearts, 13).point_value(), 10);
    }

    #[test]
    fn sort_order_matches_suit_tiebreak() {
        let mut hand = vec![
            Card::new(Suit::Clubs, 5),
            Card::new(Suit::Spades, 5),
            Card::new(Suit::Hearts, 2),
        ];
        sort_hand(&mut hand);
        assert_eq!(hand[0], Card::new(Suit::Hearts, 2));
        assert_eq!(hand[1], Card::new(Suit::Spades, 5));
        assert_eq!(hand[2], Card::new(Suit::Clubs, 5));
    }
}
