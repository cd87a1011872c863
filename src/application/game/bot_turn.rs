use std::sync::Arc;

use crate::domain::entities::PlayerId;
use crate::domain::repositories::{RepositoryError, RoomRepository};
use crate::domain::services::turn_engine::{execute_turn_action, TurnAction, TurnChoice, TurnResult};
use crate::infrastructure::bot::lookahead::PickupCandidate;
use crate::infrastructure::bot::strategy_for;

use super::call_yaniv::{CallYaniv, CallYanivError, CallYanivInput, CallYanivOutput};

pub enum BotTurnOutcome {
    YanivCalled(CallYanivOutput),
    TurnPlayed(TurnResult),
}

/// Drive one bot's turn: call Yaniv if its hand already clears the
/// threshold, otherwise pick a discard and a draw source through its
/// difficulty's strategy (spec.md §4.3). Not responsible for scheduling —
/// callers invoke this once it is a bot's turn.
pub struct BotTurn<R: RoomRepository> {
    room_repo: Arc<R>,
    call_yaniv: CallYaniv<R>,
}

impl<R: RoomRepository> BotTurn<R> {
    pub fn new(room_repo: Arc<R>) -> Self {
        Self {
            call_yaniv: CallYaniv::new(room_repo.clone()),
            room_repo,
        }
    }

    pub async fn execute(
        &self,
        room_id: &str,
        bot_id: &PlayerId,
        difficulty: crate::domain::entities::BotDifficulty,
    ) -> Result<BotTurnOutcome, BotTurnError> {
        let mut game = self
            .room_repo
            .find_game_state(room_id)
            .await?
            .ok_or(BotTurnError::NoGameInProgress)?;

        if game.game_ended {
            return Err(BotTurnError::GameEnded);
        }
        if game.current_player_id() != bot_id {
            return Err(BotTurnError::NotYourTurn);
        }

        let strategy = strategy_for(difficulty);
        let hand = game.hand_of(bot_id).to_vec();

        if strategy.should_call_yaniv(&hand, game.can_call_yaniv) {
            let outcome = self
                .call_yaniv
                .execute(CallYanivInput {
                    player_id: bot_id.clone(),
                    room_id: room_id.to_string(),
                })
                .await?;
            return Ok(BotTurnOutcome::YanivCalled(outcome));
        }

        let selected_cards = strategy.choose_discard(&hand, &game.pickup_cards);
        let choice = match strategy.decide_pickup(&hand, &game.pickup_cards) {
            PickupCandidate::Edge(pickup_index) => TurnChoice::Pickup { pickup_index },
            PickupCandidate::Skip => TurnChoice::Deck,
        };

        let mut rng = rand::thread_rng();
        let result = execute_turn_action(
            &mut game,
            bot_id,
            TurnAction { selected_cards, choice },
            &mut rng,
            false,
        )
        .expect("a bot strategy always selects a valid set from its own hand");

        self.room_repo.save_game_state(room_id, game).await?;
        Ok(BotTurnOutcome::TurnPlayed(result))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BotTurnError {
    #[error("No game in progress for this room")]
    NoGameInProgress,
    #[error("The match has already ended")]
    GameEnded,
    #[error("It is not this bot's turn")]
    NotYourTurn,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Call Yaniv error: {0}")]
    CallYaniv(#[from] CallYanivError),
}
