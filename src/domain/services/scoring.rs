//! Yaniv/Assaf resolution and per-round scoring (spec.md §4.2).

use crate::domain::entities::{hand_value, Card, PlayerId, PlayerStatus};
use crate::domain::value_objects::GameState;

/// The penalty added to a caller's score when another player is tied or
/// lower and the call is "assaffed".
pub const ASSAF_PENALTY: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YanivOutcome {
    pub winner: PlayerId,
    /// `Some(caller)` iff the caller was assaffed; `None` means a clean win.
    pub assaf_caller: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YanivError {
    HandTooHigh { value: u32, max: u32 },
}

/// Resolve a Yaniv call by `caller` against every other active player's
/// current hand. `caller` must already have hand value `<= can_call_yaniv`,
/// checked by the caller of this function against `game.can_call_yaniv`.
pub fn resolve_yaniv(
    game: &GameState,
    caller: &str,
) -> Result<YanivOutcome, YanivError> {
    let caller_value = hand_value(game.hand_of(caller));
    if caller_value > game.can_call_yaniv {
        return Err(YanivError::HandTooHigh {
            value: caller_value,
            max: game.can_call_yaniv,
        });
    }

    let mut best: Option<(&PlayerId, u32)> = None;
    for pid in game.player_order.iter() {
        if pid == caller || !game.is_active(pid) {
            continue;
        }
        let v = hand_value(game.hand_of(pid));
        match best {
            None => best = Some((pid, v)),
            Some((_, best_v)) if v < best_v => best = Some((pid, v)),
            _ => {}
        }
    }

    match best {
        Some((opponent, opponent_value)) if opponent_value <= caller_value => Ok(YanivOutcome {
            winner: opponent.clone(),
            assaf_caller: Some(caller.to_string()),
        }),
        _ => Ok(YanivOutcome {
            winner: caller.to_string(),
            assaf_caller: None,
        }),
    }
}

/// A single player's round-end tally: the raw addition, and whether the
/// ×50 bonus reduction applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundDelta {
    pub added: i64,
    pub bonus_reduction_applied: bool,
    pub new_score: i64,
    pub newly_eliminated: bool,
}

/// Apply one round's scoring to `player`'s running score (spec.md §4.2):
/// 0 for the round winner, `30 + handValue` for an assaffed caller,
/// `handValue` otherwise; then subtract 50 if the result is a nonzero
/// multiple of 50; then compare to `max_match_points`.
pub fn apply_round_score(
    previous_score: i64,
    hand: &[Card],
    is_yaniv_caller: bool,
    is_round_winner: bool,
    max_match_points: u32,
) -> RoundDelta {
    let value = hand_value(hand) as i64;
    let added = if is_round_winner {
        0
    } else if is_yaniv_caller {
        ASSAF_PENALTY as i64 + value
    } else {
        value
    };

    let mut new_score = previous_score + added;
    let bonus_reduction_applied = new_score != 0 && new_score % 50 == 0;
    if bonus_reduction_applied {
        new_score -= 50;
    }

    let newly_eliminated = new_score > max_match_points as i64;

    RoundDelta {
        added,
        bonus_reduction_applied,
        new_score,
        newly_eliminated,
    }
}

/// Insert newly-eliminated players into `players_loser_order`, breaking
/// within-round ties by descending player id for determinism (spec.md §4.2).
pub fn append_losers_deterministically(
    players_loser_order: &mut Vec<PlayerId>,
    mut newly_eliminated: Vec<PlayerId>,
) {
    newly_eliminated.sort_by(|a, b| b.cmp(a));
    players_loser_order.extend(newly_eliminated);
}

/// Final placement list for `game_ended` (spec.md §4.2): winner first (if
/// not already represented), then the reverse of elimination order, with
/// players who left the match appended last.
pub fn compute_final_places(
    winner: Option<&PlayerId>,
    players_loser_order: &[PlayerId],
    player_statuses: &[(PlayerId, PlayerStatus)],
) -> Vec<PlayerId> {
    let mut places: Vec<PlayerId> = Vec::new();
    if let Some(w) = winner {
        places.push(w.clone());
    }
    for pid in players_loser_order.iter().rev() {
        if Some(pid) != winner {
            places.push(pid.clone());
        }
    }
    for (pid, status) in player_statuses {
        if *status == PlayerStatus::Leave && !places.contains(pid) {
            places.push(pid.clone());
        }
    }
    places
}

/// Resolve the winner when a round empties the room of active players
/// (spec.md §9 ambiguity note): prefer the assaf caller on ties, else the
/// lowest score, else lowest player id in player order.
pub fn resolve_zero_active_winner(
    candidates: &[(PlayerId, i64)],
    assaf_caller: Option<&PlayerId>,
) -> Option<PlayerId> {
    if candidates.is_empty() {
        return None;
    }
    let min_score = candidates.iter().map(|(_, s)| *s).min().unwrap();
    let tied: Vec<&PlayerId> = candidates
        .iter()
        .filter(|(_, s)| *s == min_score)
        .map(|(pid, _)| pid)
        .collect();

    if tied.len() == 1 {
        return Some(tied[0].clone());
    }
    if let Some(assaf) = assaf_caller {
        if tied.iter().any(|pid| *pid == assaf) {
            return Some(assaf.clone());
        }
    }
    tied.into_iter().min().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Suit;

    fn c(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn bonus_reduction_at_multiple_of_50_s5() {
        let hand = vec![c(Suit::Hearts, 10)];
        let delta = apply_round_score(40, &hand, false, false, 100);
        assert_eq!(delta.new_score, 0);
        assert!(delta.bonus_reduction_applied);
    }

    #[test]
    fn assaf_penalty_applies_s6() {
        let hand = vec![c(Suit::Hearts, 7)];
        let delta = apply_round_score(0, &hand, true, false, 100);
        assert_eq!(delta.added, 37);
    }

    #[test]
    fn winner_scores_zero() {
        let hand = vec![c(Suit::Hearts, 7)];
        let delta = apply_round_score(10, &hand, true, true, 100);
        assert_eq!(delta.added, 0);
        assert_eq!(delta.new_score, 10);
    }

    #[test]
    fn elimination_flagged_above_max() {
        let hand = vec![c(Suit::Hearts, 10), c(Suit::Clubs, 10)];
        let delta = apply_round_score(95, &hand, false, false, 100);
        assert!(delta.newly_eliminated);
    }

    #[test]
    fn final_places_reverses_loser_order_and_puts_leavers_last() {
        let places = compute_final_places(
            Some(&"w".to_string()),
            &["a".to_string(), "b".to_string()],
            &[("c".to_string(), PlayerStatus::Leave)],
        );
        assert_eq!(places, vec!["w", "b", "a", "c"]);
    }

    #[test]
    fn zero_active_prefers_assaf_caller_on_tie() {
        let candidates = vec![("x".to_string(), 10), ("y".to_string(), 10)];
        let resolved = resolve_zero_active_winner(&candidates, Some(&"y".to_string()));
        assert_eq!(resolved, Some("y".to_string()));
    }
}
