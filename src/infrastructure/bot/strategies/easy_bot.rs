use crate::domain::entities::Card;
use crate::infrastructure::bot::discard_policy::{choose_discard, JokerPolicy};
use crate::infrastructure::bot::lookahead::{decide_pickup, PickupCandidate};

use super::BotStrategy;

/// Easy bot: never proposes synthesized runs; plays mostly off sets and
/// high-card discards (spec.md §4.3).
#[derive(Debug, Default, Clone, Copy)]
pub struct EasyBot;

impl BotStrategy for EasyBot {
    fn choose_discard(&self, hand: &[Card], pickup_cards: &[Card]) -> Vec<Card> {
        choose_discard(hand, pickup_cards, JokerPolicy::NoRuns)
    }

    fn decide_pickup(&self, hand: &[Card], pickup_cards: &[Card]) -> PickupCandidate {
        decide_pickup(hand, pickup_cards, JokerPolicy::NoRuns, false)
    }
}
