pub mod discard_policy;
pub mod lookahead;
pub mod strategies;

use crate::domain::entities::BotDifficulty;
use strategies::{BotStrategy, EasyBot, HardBot, MediumBot};

/// Resolve the strategy implementation for a bot's configured difficulty.
pub fn strategy_for(difficulty: BotDifficulty) -> Box<dyn BotStrategy> {
    match difficulty {
        BotDifficulty::Easy => Box::new(EasyBot),
        BotDifficulty::Medium => Box::new(MediumBot),
        BotDifficulty::Hard => Box::new(HardBot),
    }
}
