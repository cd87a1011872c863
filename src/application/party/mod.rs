//! Room lifecycle and matchmaking use cases (spec.md §4.4).

mod common;

pub mod auto_start_quick_game;
pub mod create_bot_room;
pub mod create_room;
pub mod get_room_state;
pub mod join_room;
pub mod leave_room;
pub mod play_again;
pub mod quick_game;
pub mod set_quick_game_config;
pub mod start_private_game;

pub use auto_start_quick_game::{
    AutoStartQuickGame, AutoStartQuickGameError, AutoStartQuickGameInput, AutoStartQuickGameOutcome,
};
pub use create_bot_room::{CreateBotRoom, CreateBotRoomError, CreateBotRoomInput, CreateBotRoomOutput};
pub use create_room::{CreateRoom, CreateRoomError, CreateRoomInput, CreateRoomOutput};
pub use get_room_state::{GetRoomState, GetRoomStateError, GetRoomStateInput, GetRoomStateOutput};
pub use join_room::{JoinRoom, JoinRoomError, JoinRoomInput, JoinRoomOutput};
pub use leave_room::{LeaveRoom, LeaveRoomError, LeaveRoomInput, LeaveRoomOutcome};
pub use play_again::{PlayAgain, PlayAgainError, PlayAgainInput, PlayAgainOutcome};
pub use quick_game::{QuickGame, QuickGameError, QuickGameInput, QuickGameOutput};
pub use set_quick_game_config::{
    SetQuickGameConfig, SetQuickGameConfigError, SetQuickGameConfigInput, SetQuickGameConfigOutput,
};
pub use start_private_game::{
    StartPrivateGame, StartPrivateGameError, StartPrivateGameInput, StartPrivateGameOutput,
};
