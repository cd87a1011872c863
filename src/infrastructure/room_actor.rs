//! One Tokio task per room, owning that room's slice of state exclusively
//! (spec.md §5 Concurrency & resource model, SPEC_FULL.md §5). Every
//! mutation — an inbound command or a timer firing — is dequeued and
//! handled to completion before the next is taken, so no two mutations of
//! the same `GameState` ever interleave.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::api::{ApiError, CommandHandler, InboundCommand, OutboundEvent, RoomEvent};
use crate::application::game::{
    AdvanceRound, AdvanceRoundInput, AdvanceRoundOutcome, BotTurn, BotTurnOutcome, SlapDownExpire,
    SlapDownExpireInput, TurnTimeout, TurnTimeoutInput, TurnTimeoutOutcome,
};
use crate::application::party::{AutoStartQuickGame, AutoStartQuickGameInput, AutoStartQuickGameOutcome};
use crate::domain::entities::{BotDifficulty, PlayerId, RoomId, RoomPhase, RoomVisibility};
use crate::domain::repositories::RoomRepository;
use crate::domain::value_objects::quick_game_start_delay_seconds;

use crate::api::events::round_ended_events;

/// Everything that can land in a room's inbound queue: a client-issued
/// command, or a synthetic command enqueued by one of the room's own
/// timers (spec.md §5 Suspension points).
pub enum RoomCommand {
    Inbound {
        player_id: PlayerId,
        command: InboundCommand,
        reply: oneshot::Sender<Result<Vec<RoomEvent>, String>>,
    },
    TurnTimeout {
        generation: u64,
    },
    SlapDownExpire {
        generation: u64,
    },
    /// Fired once a `game_initialized`/`new_round` display delay elapses;
    /// arms the first turn's timer and drives any leading bot turns
    /// (spec.md §4.2 Deal: "and only then arm the first turn's timer").
    /// `round` guards against a stale timer firing after a faster-resolving
    /// `play_again` or round transition already moved the match on.
    BeginRound {
        round: u32,
    },
    /// Fired `roundResultDelayMs` after a round ended and the match
    /// continues; deals the next round (spec.md §4.2 Round end broadcast).
    AdvanceRound {
        round: u32,
    },
    /// Re-evaluate the staged quick-game start timer for a waiting public
    /// room (spec.md §4.4). Harmless no-op for a private or already-started
    /// room; sent unconditionally after any command that may have changed
    /// the room's roster.
    CheckAutoStart,
    /// Fired once the staged quick-game start timer (re)armed at
    /// `seats_at_arm_time` seats expires.
    AutoStartQuickGame {
        seats_at_arm_time: usize,
    },
    /// Sent once `RoomManager` observes the room destroyed. The actor
    /// holds a clone of its own sender (to re-arm timers), so the queue
    /// never empties on its own; without this, the task would never
    /// exit once spawned.
    Shutdown,
}

/// A cheaply-cloneable reference to a running room actor's inbound queue.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    /// Send a client command and await its resulting events. Resolves to
    /// `Err` only if the room actor has already shut down.
    pub async fn dispatch(
        &self,
        player_id: PlayerId,
        command: InboundCommand,
    ) -> Result<Vec<RoomEvent>, String> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Inbound { player_id, command, reply })
            .map_err(|_| "room actor has shut down".to_string())?;
        rx.await.map_err(|_| "room actor dropped the reply channel".to_string())?
    }

    /// Ask the room to re-check its staged quick-game start timer. Used by
    /// `RoomManager` right after spawning the actor for a freshly created
    /// public room, since the room existed for one `quick_game` dispatch
    /// before any actor was there to receive it.
    pub fn check_auto_start(&self) {
        self.fire(RoomCommand::CheckAutoStart);
    }

    /// Fire a synthetic timer command without waiting for a reply — this
    /// is how `arm`'s spawned sleeps feed the room's own queue.
    fn fire(&self, command: RoomCommand) {
        let _ = self.sender.send(command);
    }

    /// Stop the room's actor task. Called by `RoomManager` once it has
    /// removed the room from its routing table; never called by the
    /// actor itself.
    pub fn shutdown(&self) {
        let _ = self.sender.send(RoomCommand::Shutdown);
    }
}

/// What kind of follow-up scheduling, if any, a just-handled inbound
/// command might need. Captured from the command's shape before it is
/// moved into `handler.handle`, since the events it produces don't always
/// carry everything a timer needs (e.g. the round a `round_ended` belongs
/// to, re-derived from the persisted `GameState` instead).
#[derive(Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    RosterChange,
    TurnAdvancing,
    CallYaniv,
    Other,
}

impl From<&InboundCommand> for CommandKind {
    fn from(command: &InboundCommand) -> Self {
        match command {
            InboundCommand::JoinRoom { .. }
            | InboundCommand::QuickGame { .. }
            | InboundCommand::SetQuickGameConfig { .. }
            | InboundCommand::LeaveRoom { .. } => CommandKind::RosterChange,
            // `SlapDown` never changes whose turn it is — the turn already
            // advanced when the slapper drew the card that opened the
            // window — so it needs no follow-up scheduling of its own.
            InboundCommand::CompleteTurn { .. } => CommandKind::TurnAdvancing,
            InboundCommand::CallYaniv { .. } => CommandKind::CallYaniv,
            _ => CommandKind::Other,
        }
    }
}

/// Spawn a room's actor task. `broadcaster` receives every `RoomEvent`
/// the room produces, for transport fan-out; `handler` is shared across
/// every room (it is itself stateless beyond the repository handle).
pub fn spawn_room_actor<R: RoomRepository + 'static>(
    room_id: RoomId,
    handler: Arc<CommandHandler<R>>,
    room_repo: Arc<R>,
    broadcaster: async_broadcast::Sender<RoomEvent>,
) -> RoomHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<RoomCommand>();
    let handle = RoomHandle { sender: tx };
    let loopback = handle.clone();

    tokio::spawn(async move {
        let turn_timeout = TurnTimeout::new(room_repo.clone());
        let slap_down_expire = SlapDownExpire::new(room_repo.clone());
        let advance_round = AdvanceRound::new(room_repo.clone());
        let auto_start = AutoStartQuickGame::new(room_repo.clone());

        while let Some(command) = rx.recv().await {
            match command {
                RoomCommand::Inbound { player_id, command, reply } => {
                    let kind = CommandKind::from(&command);
                    let result = handler.handle(player_id, command).await;
                    let events = broadcast_result(&broadcaster, result);

                    if let Ok(events) = &events {
                        match kind {
                            CommandKind::TurnAdvancing => {
                                drive_turn(&room_id, &room_repo, &broadcaster, &loopback).await;
                            }
                            CommandKind::CallYaniv => {
                                schedule_advance_round_from_events(&room_id, &room_repo, &loopback, events).await;
                            }
                            CommandKind::RosterChange => {
                                check_auto_start(&room_id, &room_repo, &loopback).await;
                            }
                            CommandKind::Other => {}
                        }
                        schedule_begin_round_from_events(&loopback, events);
                    }

                    let _ = reply.send(events);
                }
                RoomCommand::TurnTimeout { generation } => {
                    if let Ok(TurnTimeoutOutcome::Applied(result)) = turn_timeout
                        .execute(TurnTimeoutInput { room_id: room_id.clone(), generation })
                        .await
                    {
                        let _ = broadcaster.try_broadcast(RoomEvent::new(
                            room_id.clone(),
                            crate::api::events::player_drew_event(&result),
                        ));
                        drive_turn(&room_id, &room_repo, &broadcaster, &loopback).await;
                    }
                }
                RoomCommand::SlapDownExpire { generation } => {
                    let _ = slap_down_expire
                        .execute(SlapDownExpireInput { room_id: room_id.clone(), generation })
                        .await;
                }
                RoomCommand::BeginRound { round } => {
                    if let Ok(Some(game)) = room_repo.find_game_state(&room_id).await {
                        if !game.game_ended && game.round == round {
                            drive_turn(&room_id, &room_repo, &broadcaster, &loopback).await;
                        }
                    }
                }
                RoomCommand::AdvanceRound { round } => {
                    if let Ok(AdvanceRoundOutcome::Applied { game, start_delay_ms }) =
                        advance_round.execute(AdvanceRoundInput { room_id: room_id.clone(), round }).await
                    {
                        let next_round = game.round;
                        let _ = broadcaster.try_broadcast(RoomEvent::new(
                            room_id.clone(),
                            OutboundEvent::NewRound { game, start_delay_ms, round: next_round },
                        ));
                        schedule_after(&loopback, Duration::from_millis(start_delay_ms), RoomCommand::BeginRound {
                            round: next_round,
                        });
                    }
                }
                RoomCommand::CheckAutoStart => {
                    check_auto_start(&room_id, &room_repo, &loopback).await;
                }
                RoomCommand::AutoStartQuickGame { seats_at_arm_time } => {
                    if let Ok(AutoStartQuickGameOutcome::Started { room, game, start_delay_ms }) = auto_start
                        .execute(AutoStartQuickGameInput { room_id: room_id.clone(), seats_at_arm_time })
                        .await
                    {
                        let _ = broadcaster
                            .try_broadcast(RoomEvent::new(room_id.clone(), OutboundEvent::StartGame { room }));
                        let _ = broadcaster.try_broadcast(RoomEvent::new(
                            room_id.clone(),
                            OutboundEvent::GameInitialized { game, start_delay_ms },
                        ));
                        schedule_after(&loopback, Duration::from_millis(start_delay_ms), RoomCommand::BeginRound {
                            round: 1,
                        });
                    }
                }
                RoomCommand::Shutdown => break,
            }
        }
    });

    handle
}

fn broadcast_result(
    broadcaster: &async_broadcast::Sender<RoomEvent>,
    result: Result<Vec<RoomEvent>, ApiError>,
) -> Result<Vec<RoomEvent>, String> {
    match result {
        Ok(events) => {
            for event in &events {
                let _ = broadcaster.try_broadcast(event.clone());
            }
            Ok(events)
        }
        Err(err) => {
            let _ = broadcaster.try_broadcast(RoomEvent::new(
                "".to_string(),
                OutboundEvent::GameError { message: err.message.clone() },
            ));
            Err(err.message)
        }
    }
}

/// Drive the turn machine from whatever state was just persisted: play
/// every consecutive bot turn automatically (spec.md §4.3), then arm the
/// human turn/slap-down timers once a human (or nobody, match over) is up
/// (spec.md §4.2 Turn (human), §9 Timers). Entered after a human's turn,
/// a forced timeout, or a round's first deal.
async fn drive_turn<R: RoomRepository + 'static>(
    room_id: &RoomId,
    room_repo: &Arc<R>,
    broadcaster: &async_broadcast::Sender<RoomEvent>,
    loopback: &RoomHandle,
) {
    let bot_turn = BotTurn::new(room_repo.clone());

    loop {
        let game = match room_repo.find_game_state(room_id).await {
            Ok(Some(game)) if !game.game_ended => game,
            _ => return,
        };
        let room = match room_repo.find_room(room_id).await {
            Ok(Some(room)) => room,
            _ => return,
        };

        let current_id = game.current_player_id().clone();
        let bot_difficulty = room
            .find_player(&current_id)
            .filter(|p| p.is_bot)
            .map(|p| p.difficulty.unwrap_or(BotDifficulty::Medium));

        let Some(difficulty) = bot_difficulty else {
            let _ = broadcaster.try_broadcast(RoomEvent::new(
                room_id.clone(),
                OutboundEvent::TurnStarted {
                    current_player_id: current_id,
                    time_remaining: game.time_per_player,
                },
            ));
            schedule_after(
                loopback,
                Duration::from_secs(game.time_per_player as u64),
                RoomCommand::TurnTimeout { generation: game.turn_generation },
            );
            if let Some(window) = &game.slap_down_window {
                schedule_after(
                    loopback,
                    Duration::from_secs(3),
                    RoomCommand::SlapDownExpire { generation: window.generation },
                );
            }
            return;
        };

        match bot_turn.execute(room_id, &current_id, difficulty).await {
            Ok(BotTurnOutcome::TurnPlayed(result)) => {
                let _ = broadcaster.try_broadcast(RoomEvent::new(
                    room_id.clone(),
                    crate::api::events::player_drew_event(&result),
                ));
                // Loop: the next player (bot or human) is already current.
            }
            Ok(BotTurnOutcome::YanivCalled(out)) => {
                let had_winner = out.match_winner.is_some();
                let round = out.game.round;
                let delay_ms = out.round_result_delay_ms;
                for event in round_ended_events(room_id.clone(), &out) {
                    let _ = broadcaster.try_broadcast(event);
                }
                if !had_winner {
                    schedule_after(loopback, Duration::from_millis(delay_ms), RoomCommand::AdvanceRound { round });
                }
                return;
            }
            // Internal invariant violation (spec.md §7): log and stop, never
            // propagate to clients.
            Err(_) => return,
        }
    }
}

/// Re-derive the round a just-resolved Yaniv call ended, from the
/// persisted `GameState`, and schedule the next deal — unless the match
/// itself ended (spec.md §4.2 Round end broadcast).
async fn schedule_advance_round_from_events<R: RoomRepository>(
    room_id: &RoomId,
    room_repo: &Arc<R>,
    loopback: &RoomHandle,
    events: &[RoomEvent],
) {
    let match_ended = events.iter().any(|e| matches!(e.event, OutboundEvent::GameEnded { .. }));
    if match_ended {
        return;
    }
    let Some(round_ended) = events.iter().find_map(|e| match &e.event {
        OutboundEvent::RoundEnded { delay_ms, .. } => Some(*delay_ms),
        _ => None,
    }) else {
        return;
    };
    let Ok(Some(game)) = room_repo.find_game_state(room_id).await else {
        return;
    };
    if game.game_ended {
        return;
    }
    schedule_after(
        loopback,
        Duration::from_millis(round_ended),
        RoomCommand::AdvanceRound { round: game.round },
    );
}

/// Arm the first turn's timer only after the display delay a fresh deal
/// just announced has elapsed (spec.md §4.2 Deal).
fn schedule_begin_round_from_events(loopback: &RoomHandle, events: &[RoomEvent]) {
    for event in events {
        match &event.event {
            OutboundEvent::GameInitialized { start_delay_ms, .. } => {
                schedule_after(loopback, Duration::from_millis(*start_delay_ms), RoomCommand::BeginRound { round: 1 });
            }
            OutboundEvent::NewRound { start_delay_ms, round, .. } => {
                schedule_after(loopback, Duration::from_millis(*start_delay_ms), RoomCommand::BeginRound {
                    round: *round,
                });
            }
            _ => {}
        }
    }
}

/// Re-evaluate the staged quick-game start timer for a waiting public room
/// (spec.md §4.4): 0/1 players cancels (nothing scheduled — a later stale
/// `AutoStartQuickGame` firing simply finds the seat count mismatched),
/// otherwise arm a fresh timer at the current seat count.
async fn check_auto_start<R: RoomRepository>(room_id: &RoomId, room_repo: &Arc<R>, loopback: &RoomHandle) {
    let Ok(Some(room)) = room_repo.find_room(room_id).await else {
        return;
    };
    if room.game_state != RoomPhase::Waiting || room.visibility != RoomVisibility::Public {
        return;
    }
    let Some(seconds) = quick_game_start_delay_seconds(room.players.len()) else {
        return;
    };
    schedule_after(loopback, Duration::from_secs(seconds), RoomCommand::AutoStartQuickGame {
        seats_at_arm_time: room.players.len(),
    });
}

fn schedule_after(handle: &RoomHandle, delay: Duration, command: RoomCommand) {
    let handle = handle.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        handle.fire(command);
    });
}
