use serde::{Deserialize, Serialize};

/// Per-room rule configuration (spec.md §3/§6). Defaults match the
/// documented config defaults: slapDown=true, timePerPlayer=15,
/// canCallYaniv=7, maxMatchPoints=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    pub slap_down: bool,
    pub time_per_player: u32,
    pub can_call_yaniv: u32,
    pub max_match_points: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            slap_down: true,
            time_per_player: 15,
            can_call_yaniv: 7,
            max_match_points: 100,
        }
    }
}

/// Resolve the quick-game config vote: for each field, take the value with
/// a strict majority among the submitted votes; otherwise fall back to the
/// default (spec.md §4.4).
pub fn resolve_majority_vote(votes: &[RoomConfig]) -> RoomConfig {
    let default = RoomConfig::default();
    if votes.is_empty() {
        return default;
    }

    RoomConfig {
        slap_down: majority_bool(votes.iter().map(|v| v.slap_down), default.slap_down),
        time_per_player: majority_value(votes.iter().map(|v| v.time_per_player), default.time_per_player),
        can_call_yaniv: majority_value(votes.iter().map(|v| v.can_call_yaniv), default.can_call_yaniv),
        max_match_points: majority_value(votes.iter().map(|v| v.max_match_points), default.max_match_points),
    }
}

fn majority_bool(values: impl Iterator<Item = bool>, default: bool) -> bool {
    let values: Vec<bool> = values.collect();
    let total = values.len();
    let trues = values.iter().filter(|v| **v).count();
    if trues * 2 > total {
        true
    } else if (total - trues) * 2 > total {
        false
    } else {
        default
    }
}

fn majority_value<T: Eq + std::hash::Hash + Copy>(values: impl Iterator<Item = T>, default: T) -> T {
    use std::collections::HashMap;
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut total = 0;
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
        total += 1;
    }
    counts
        .into_iter()
        .find(|(_, count)| count * 2 > total)
        .map(|(value, _)| value)
        .unwrap_or(default)
}

/// Staged start timer duration after a waiting public room's player count
/// changes (spec.md §4.4).
pub fn quick_game_start_delay_seconds(player_count: usize) -> Option<u64> {
    match player_count {
        0 | 1 => None,
        2 => Some(3),
        3 => Some(10),
        _ => Some(7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_picks_strict_majority() {
        let votes = vec![
            RoomConfig {
                time_per_player: 30,
                ..RoomConfig::default()
            },
            RoomConfig {
                time_per_player: 30,
                ..RoomConfig::default()
            },
            RoomConfig {
                time_per_player: 15,
                ..RoomConfig::default()
            },
        ];
        let resolved = resolve_majority_vote(&votes);
        assert_eq!(resolved.time_per_player, 30);
    }

    #[test]
    fn no_majority_falls_back_to_default() {
        let votes = vec![
            RoomConfig {
                time_per_player: 30,
                ..RoomConfig::default()
            },
            RoomConfig {
                time_per_player: 45,
                ..RoomConfig::default()
            },
        ];
        let resolved = resolve_majority_vote(&votes);
        assert_eq!(resolved.time_per_player, RoomConfig::default().time_per_player);
    }

    #[test]
    fn start_delay_steps() {
        assert_eq!(quick_game_start_delay_seconds(0), None);
        assert_eq!(quick_game_start_delay_seconds(1), None);
        assert_eq!(quick_game_start_delay_seconds(2), Some(3));
        assert_eq!(quick_game_start_delay_seconds(3), Some(10));
        assert_eq!(quick_game_start_delay_seconds(4), Some(7));
        assert_eq!(quick_game_start_delay_seconds(8), Some(7));
    }
}
