use crate::domain::entities::Card;
use crate::infrastructure::bot::discard_policy::{choose_discard, JokerPolicy};
use crate::infrastructure::bot::lookahead::{decide_pickup, PickupCandidate};

use super::BotStrategy;

/// Medium bot: considers runs in hand but rejects any that required a
/// joker to complete (spec.md §4.3).
#[derive(Debug, Default, Clone, Copy)]
pub struct MediumBot;

impl BotStrategy for MediumBot {
    fn choose_discard(&self, hand: &[Card], pickup_cards: &[Card]) -> Vec<Card> {
        choose_discard(hand, pickup_cards, JokerPolicy::RejectSynthesized)
    }

    fn decide_pickup(&self, hand: &[Card], pickup_cards: &[Card]) -> PickupCandidate {
        decide_pickup(hand, pickup_cards, JokerPolicy::RejectSynthesized, false)
    }
}
