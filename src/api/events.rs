//! Outbound events the core emits in response to a command or a timer
//! firing (spec.md §6). A transport adapter is responsible for mapping
//! these onto wire frames and fanning them out to room participants; this
//! core only decides *what* happened and *to which room*.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Card, PlayerId, PlayerStatusEntry, Room};
use crate::domain::services::turn_engine::{DrawSource, TurnResult};
use crate::domain::services::compute_final_places;
use crate::domain::value_objects::GameState;

use crate::application::game::{CallYanivOutput, PlayerRoundDelta};

/// An event scoped to a single room, ready for the transport to broadcast
/// to every participant of `room_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEvent {
    pub room_id: String,
    pub event: OutboundEvent,
}

impl RoomEvent {
    pub fn new(room_id: impl Into<String>, event: OutboundEvent) -> Self {
        Self { room_id: room_id.into(), event }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundEvent {
    // Lobby events (spec.md §6).
    RoomCreated { room: Room },
    PlayerJoined { room: Room },
    /// `room` is `None` when the departure emptied and destroyed the room.
    PlayerLeft { room: Option<Room>, player_id: PlayerId },
    VotesConfig { room: Room },
    RoomError { message: String },
    StartGame { room: Room },

    // Game events (spec.md §6).
    GameInitialized { game: GameState, start_delay_ms: u64 },
    NewRound { game: GameState, start_delay_ms: u64, round: u32 },
    TurnStarted { current_player_id: PlayerId, time_remaining: u32 },
    PlayerDrew {
        player_id: PlayerId,
        source: DrawSourceWire,
        hands_size: std::collections::HashMap<PlayerId, usize>,
        pickup_cards: Vec<Card>,
        card: Option<Card>,
        selected_cards_positions: Vec<usize>,
        amount_before: usize,
        current_player_id: PlayerId,
        slap_down_active_for: Option<PlayerId>,
    },
    DeckReshuffled,
    RoundEnded {
        winner_id: PlayerId,
        players_stats: std::collections::HashMap<PlayerId, PlayerStatusEntry>,
        yaniv_caller: PlayerId,
        assaf_caller: Option<PlayerId>,
        players_round_score: Vec<PlayerRoundDeltaWire>,
        losers: Vec<PlayerId>,
        delay_ms: u64,
    },
    HumanLost { player_id: PlayerId },
    GameEnded {
        winner: Option<PlayerId>,
        places: Vec<PlayerId>,
        players_stats: std::collections::HashMap<PlayerId, PlayerStatusEntry>,
    },
    SetPlayersStatsData {
        room_id: String,
        player_id: PlayerId,
        players_stats: std::collections::HashMap<PlayerId, PlayerStatusEntry>,
    },
    GameError { message: String },

    /// Direct reply to `get_room_state`, not broadcast (spec.md §6: "request/response").
    RoomState { room: Room, game: Option<GameState> },
}

/// Wire-friendly mirror of `DrawSource` (tagged, lowercase, per spec.md §9
/// "discriminated unions, not strings at the core boundary" — this is the
/// one string the contract itself names, so it is rendered at the edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawSourceWire {
    Deck,
    Pickup,
    Slap,
}

impl From<DrawSource> for DrawSourceWire {
    fn from(source: DrawSource) -> Self {
        match source {
            DrawSource::Deck => DrawSourceWire::Deck,
            DrawSource::Pickup => DrawSourceWire::Pickup,
            DrawSource::Slap => DrawSourceWire::Slap,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRoundDeltaWire {
    pub player_id: PlayerId,
    pub added: i64,
    pub new_score: i64,
    pub bonus_reduction_applied: bool,
}

impl From<&PlayerRoundDelta> for PlayerRoundDeltaWire {
    fn from(d: &PlayerRoundDelta) -> Self {
        Self {
            player_id: d.player_id.clone(),
            added: d.added,
            new_score: d.new_score,
            bonus_reduction_applied: d.bonus_reduction_applied,
        }
    }
}

/// Build the `player_drew` event from a turn engine result, including the
/// post-action hand sizes it carries (spec.md §4.2 `player_drew`).
pub fn player_drew_event(result: &TurnResult) -> OutboundEvent {
    OutboundEvent::PlayerDrew {
        player_id: result.player_id.clone(),
        source: result.source.into(),
        hands_size: result.hand_sizes.clone(),
        pickup_cards: result.new_pickup_cards.clone(),
        card: result.drawn_card,
        selected_cards_positions: result.selected_cards_positions.clone(),
        amount_before: result.amount_before,
        current_player_id: result.next_current_player_id.clone(),
        slap_down_active_for: result.slap_down_active_for.clone(),
    }
}

/// Broadcast for one completed turn: `player_drew`, plus `deck_reshuffled`
/// if the draw pile was just refilled (spec.md §4.2). The `turn_started`
/// announcement for whoever goes next is not emitted here — the room actor
/// emits it once it knows who that is after driving any consecutive bot
/// turns (spec.md §4.3), so a bot's own move never surfaces a premature
/// `turn_started` for itself.
pub fn turn_advance_events(room_id: impl Into<String>, result: &TurnResult) -> Vec<RoomEvent> {
    let room_id = room_id.into();
    let mut events = vec![RoomEvent::new(room_id.clone(), player_drew_event(result))];
    if result.deck_reshuffled {
        events.push(RoomEvent::new(room_id, OutboundEvent::DeckReshuffled));
    }
    events
}

/// Full broadcast for a resolved Yaniv call: `round_ended`, a
/// `human_lost` per newly-eliminated player, a `set_playersStats_data`
/// per player (the per-recipient stats refresh spec.md §6 lists
/// alongside `round_ended`/`game_ended`), plus `game_ended` if that was
/// the match's last active player (spec.md §4.2 Round end broadcast).
/// Shared by the `call_yaniv` command path and a bot's own call.
pub fn round_ended_events(room_id: impl Into<String>, out: &CallYanivOutput) -> Vec<RoomEvent> {
    let room_id = room_id.into();
    let mut events = vec![RoomEvent::new(
        room_id.clone(),
        OutboundEvent::RoundEnded {
            winner_id: out.outcome.winner.clone(),
            players_stats: out.game.players_stats.clone(),
            yaniv_caller: out.outcome.assaf_caller.clone().unwrap_or(out.outcome.winner.clone()),
            assaf_caller: out.outcome.assaf_caller.clone(),
            players_round_score: out.deltas.iter().map(PlayerRoundDeltaWire::from).collect(),
            losers: out.game.players_loser_order.clone(),
            delay_ms: out.round_result_delay_ms,
        },
    )];
    for delta in &out.deltas {
        if delta.newly_eliminated {
            events.push(RoomEvent::new(
                room_id.clone(),
                OutboundEvent::HumanLost { player_id: delta.player_id.clone() },
            ));
        }
    }
    for player_id in out.game.players_stats.keys() {
        events.push(RoomEvent::new(
            room_id.clone(),
            OutboundEvent::SetPlayersStatsData {
                room_id: room_id.clone(),
                player_id: player_id.clone(),
                players_stats: out.game.players_stats.clone(),
            },
        ));
    }
    if let Some(winner) = &out.match_winner {
        let player_statuses: Vec<(PlayerId, crate::domain::entities::PlayerStatus)> = out
            .game
            .players_stats
            .iter()
            .map(|(pid, entry)| (pid.clone(), entry.status))
            .collect();
        let places = compute_final_places(Some(winner), &out.game.players_loser_order, &player_statuses);
        events.push(RoomEvent::new(
            room_id,
            OutboundEvent::GameEnded {
                winner: Some(winner.clone()),
                places,
                players_stats: out.game.players_stats.clone(),
            },
        ));
    }
    events
}
