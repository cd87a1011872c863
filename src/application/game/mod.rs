//! Turn orchestration and bot driving (spec.md §4.2/§4.3).

pub mod advance_round;
pub mod bot_turn;
pub mod call_yaniv;
pub mod complete_turn;
pub mod slap_down;
pub mod slap_down_expire;
pub mod start_round;
pub mod turn_timeout;

pub use advance_round::{AdvanceRound, AdvanceRoundError, AdvanceRoundInput, AdvanceRoundOutcome};
pub use bot_turn::{BotTurn, BotTurnError, BotTurnOutcome};
pub use call_yaniv::{CallYaniv, CallYanivError, CallYanivInput, CallYanivOutput, PlayerRoundDelta};
pub use complete_turn::{CompleteTurn, CompleteTurnError, CompleteTurnInput};
pub use slap_down::{SlapDown, SlapDownError, SlapDownInput};
pub use slap_down_expire::{SlapDownExpire, SlapDownExpireError, SlapDownExpireInput};
pub use start_round::{active_player_ids, deal_first_round, deal_next_round};
pub use turn_timeout::{TurnTimeout, TurnTimeoutError, TurnTimeoutInput, TurnTimeoutOutcome};
