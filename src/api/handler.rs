//! The typed event boundary: translates one `InboundCommand` into one or
//! more `OutboundEvent`s by driving the application use cases (spec.md
//! §2 Event boundary, §6). Holds no state of its own beyond the shared
//! repository handle.

use std::sync::Arc;

use crate::domain::entities::PlayerId;
use crate::domain::repositories::RoomRepository;
use crate::domain::services::turn_engine::{TurnAction, TurnChoice};

use crate::application::game::{
    call_yaniv::{CallYaniv, CallYanivInput},
    complete_turn::{CompleteTurn, CompleteTurnInput},
    slap_down::{SlapDown, SlapDownInput},
};
use crate::application::party::{
    create_bot_room::{CreateBotRoom, CreateBotRoomInput},
    create_room::{CreateRoom, CreateRoomInput},
    get_room_state::{GetRoomState, GetRoomStateInput},
    join_room::{JoinRoom, JoinRoomInput},
    leave_room::{LeaveRoom, LeaveRoomInput, LeaveRoomOutcome},
    play_again::{PlayAgain, PlayAgainInput, PlayAgainOutcome},
    quick_game::{QuickGame, QuickGameInput},
    set_quick_game_config::{SetQuickGameConfig, SetQuickGameConfigInput},
    start_private_game::{StartPrivateGame, StartPrivateGameInput},
};

use super::commands::{InboundCommand, TurnActionChoiceWire};
use super::events::{player_drew_event, round_ended_events, turn_advance_events, OutboundEvent, RoomEvent};

/// Everything that went wrong translating or applying a command, folded
/// into the two broadcast-only classes the spec allows (spec.md §7):
/// a rejected command (reported to the requester as `room_error`/
/// `game_error`) or an internal invariant violation (logged, never sent).
pub struct ApiError {
    pub message: String,
}

impl<E: std::fmt::Display> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self { message: err.to_string() }
    }
}

pub struct CommandHandler<R: RoomRepository> {
    room_repo: Arc<R>,
}

impl<R: RoomRepository> CommandHandler<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn handle(
        &self,
        player_id: PlayerId,
        command: InboundCommand,
    ) -> Result<Vec<RoomEvent>, ApiError> {
        match command {
            InboundCommand::CreateRoom { nick_name, avatar_index, config } => {
                let out = CreateRoom::new(self.room_repo.clone())
                    .execute(CreateRoomInput { player_id, nick_name, avatar_index, config })
                    .await?;
                Ok(vec![RoomEvent::new(out.room.id.clone(), OutboundEvent::RoomCreated { room: out.room })])
            }

            InboundCommand::JoinRoom { room_id, nick_name, avatar_index } => {
                let out = JoinRoom::new(self.room_repo.clone())
                    .execute(JoinRoomInput { player_id, room_id, nick_name, avatar_index })
                    .await?;
                Ok(vec![RoomEvent::new(out.room.id.clone(), OutboundEvent::PlayerJoined { room: out.room })])
            }

            InboundCommand::QuickGame { nick_name, avatar_index } => {
                let out = QuickGame::new(self.room_repo.clone())
                    .execute(QuickGameInput { player_id, nick_name, avatar_index })
                    .await?;
                Ok(vec![RoomEvent::new(out.room.id.clone(), OutboundEvent::PlayerJoined { room: out.room })])
            }

            InboundCommand::SetQuickGameConfig { room_id, config } => {
                let out = SetQuickGameConfig::new(self.room_repo.clone())
                    .execute(SetQuickGameConfigInput { player_id, room_id, config })
                    .await?;
                Ok(vec![RoomEvent::new(out.room.id.clone(), OutboundEvent::VotesConfig { room: out.room })])
            }

            InboundCommand::CreateBotRoom { nick_name, avatar_index, config, bot_difficulties } => {
                let out = CreateBotRoom::new(self.room_repo.clone())
                    .execute(CreateBotRoomInput { player_id, nick_name, avatar_index, config, bot_difficulties })
                    .await?;
                Ok(vec![RoomEvent::new(out.room.id.clone(), OutboundEvent::RoomCreated { room: out.room })])
            }

            InboundCommand::LeaveRoom { is_admin } => {
                let outcome = LeaveRoom::new(self.room_repo.clone())
                    .execute(LeaveRoomInput { player_id: player_id.clone(), is_admin })
                    .await?;
                Ok(match outcome {
                    LeaveRoomOutcome::RoomDestroyed { room_id } => {
                        vec![RoomEvent::new(room_id, OutboundEvent::PlayerLeft { room: None, player_id })]
                    }
                    LeaveRoomOutcome::RoomUpdated { room, match_ended, .. } => {
                        let mut events = vec![RoomEvent::new(
                            room.id.clone(),
                            OutboundEvent::PlayerLeft { room: Some(room.clone()), player_id },
                        )];
                        if let Some(game) = match_ended {
                            let player_statuses: Vec<(PlayerId, crate::domain::entities::PlayerStatus)> = game
                                .players_stats
                                .iter()
                                .map(|(pid, entry)| (pid.clone(), entry.status))
                                .collect();
                            let places = crate::domain::services::compute_final_places(
                                game.winner.as_ref(),
                                &game.players_loser_order,
                                &player_statuses,
                            );
                            events.push(RoomEvent::new(
                                room.id.clone(),
                                OutboundEvent::GameEnded {
                                    winner: game.winner.clone(),
                                    places,
                                    players_stats: game.players_stats,
                                },
                            ));
                        }
                        events
                    }
                })
            }

            InboundCommand::StartPrivateGame { room_id } => {
                let out = StartPrivateGame::new(self.room_repo.clone())
                    .execute(StartPrivateGameInput { player_id, room_id: room_id.clone() })
                    .await?;
                Ok(vec![
                    RoomEvent::new(room_id.clone(), OutboundEvent::StartGame { room: out.room }),
                    RoomEvent::new(
                        room_id,
                        OutboundEvent::GameInitialized { game: out.game, start_delay_ms: out.start_delay_ms },
                    ),
                ])
            }

            InboundCommand::GetRoomState { room_id } => {
                let out = GetRoomState::new(self.room_repo.clone())
                    .execute(GetRoomStateInput { room_id: room_id.clone() })
                    .await?;
                Ok(vec![RoomEvent::new(room_id, OutboundEvent::RoomState { room: out.room, game: out.game })])
            }

            InboundCommand::CompleteTurn { room_id, action, selected_cards } => {
                let choice = match action {
                    TurnActionChoiceWire::Deck => TurnChoice::Deck,
                    TurnActionChoiceWire::Pickup { pickup_index } => TurnChoice::Pickup { pickup_index },
                };
                let result = CompleteTurn::new(self.room_repo.clone())
                    .execute(CompleteTurnInput {
                        player_id,
                        room_id: room_id.clone(),
                        action: TurnAction { selected_cards, choice },
                    })
                    .await?;
                Ok(turn_advance_events(room_id, &result))
            }

            InboundCommand::CallYaniv { room_id } => {
                let out = CallYaniv::new(self.room_repo.clone())
                    .execute(CallYanivInput { player_id, room_id: room_id.clone() })
                    .await?;
                Ok(round_ended_events(room_id, &out))
            }

            InboundCommand::SlapDown { room_id, card } => {
                let result = SlapDown::new(self.room_repo.clone())
                    .execute(SlapDownInput { player_id, room_id: room_id.clone(), card })
                    .await?;
                Ok(vec![RoomEvent::new(room_id, player_drew_event(&result))])
            }

            InboundCommand::PlayerWantsToPlayAgain => {
                let outcome = PlayAgain::new(self.room_repo.clone())
                    .execute(PlayAgainInput { player_id })
                    .await?;
                Ok(match outcome {
                    PlayAgainOutcome::Waiting { room } => {
                        vec![RoomEvent::new(room.id.clone(), OutboundEvent::VotesConfig { room })]
                    }
                    PlayAgainOutcome::NewMatch { room, game, start_delay_ms } => {
                        vec![RoomEvent::new(
                            room.id,
                            OutboundEvent::NewRound { game, start_delay_ms, round: 1 },
                        )]
                    }
                })
            }
        }
    }
}
