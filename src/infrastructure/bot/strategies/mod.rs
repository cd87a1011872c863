//! Per-difficulty bot strategies. Each is a thin wrapper around the shared
//! discard policy and look-ahead, fixing the joker-usage gate for its tier
//! (spec.md §4.3).

mod easy_bot;
mod hard_bot;
mod medium_bot;

pub use easy_bot::EasyBot;
pub use hard_bot::HardBot;
pub use medium_bot::MediumBot;

use crate::domain::entities::Card;
use crate::infrastructure::bot::lookahead::PickupCandidate;

/// A difficulty-tiered bot policy over `(hand, pickupPile)`. Never mutates
/// game state; callers apply the returned decision through the same turn
/// engine a human action would go through.
pub trait BotStrategy: Send + Sync {
    fn choose_discard(&self, hand: &[Card], pickup_cards: &[Card]) -> Vec<Card>;

    fn decide_pickup(&self, hand: &[Card], pickup_cards: &[Card]) -> PickupCandidate;

    fn should_call_yaniv(&self, hand: &[Card], can_call_yaniv: u32) -> bool {
        crate::infrastructure::bot::lookahead::should_call_yaniv(hand, can_call_yaniv)
    }
}
