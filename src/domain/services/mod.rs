pub mod combination;
pub mod deal;
pub mod scoring;
pub mod turn_engine;

pub use combination::{can_pickup, find_sequence_arrangement, is_valid_set, slap_down_valid_from, SlapSide, MIN_RUN_LEN_BEFORE_PICKUP};
pub use deal::{deal_hands, first_round_start_delay_ms, next_round_start_delay_ms, reshuffle_deck, round_result_delay_ms, shuffle_new_deck, HAND_SIZE};
pub use scoring::{apply_round_score, append_losers_deterministically, compute_final_places, resolve_yaniv, resolve_zero_active_winner, RoundDelta, YanivError, YanivOutcome, ASSAF_PENALTY};
pub use turn_engine::{execute_turn_action, expire_slap_down, forced_timeout_action, resolve_slap_down, DrawSource, TurnAction, TurnChoice, TurnError, TurnResult};
