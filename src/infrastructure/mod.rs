//! Adapters: the in-memory repository, bot strategies, and the room
//! actor/manager that drives them all (spec.md §1 Non-goals — no
//! persistence, no transport; spec.md §5 Concurrency & resource model).

pub mod bot;
pub mod repositories;
pub mod room_actor;
pub mod room_manager;

pub use room_actor::{RoomCommand, RoomHandle};
pub use room_manager::RoomManager;
