use crate::domain::entities::Card;
use crate::infrastructure::bot::discard_policy::{choose_discard, JokerPolicy};
use crate::infrastructure::bot::lookahead::{decide_pickup, PickupCandidate};

use super::BotStrategy;

/// Hard bot: allows exactly one joker in a synthesized run, and counts the
/// joker-connectivity bonus in the low-card look-ahead (spec.md §4.3).
#[derive(Debug, Default, Clone, Copy)]
pub struct HardBot;

impl BotStrategy for HardBot {
    fn choose_discard(&self, hand: &[Card], pickup_cards: &[Card]) -> Vec<Card> {
        choose_discard(hand, pickup_cards, JokerPolicy::AllowOneJoker)
    }

    fn decide_pickup(&self, hand: &[Card], pickup_cards: &[Card]) -> PickupCandidate {
        decide_pickup(hand, pickup_cards, JokerPolicy::AllowOneJoker, true)
    }
}
