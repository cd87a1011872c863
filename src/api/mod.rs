//! Typed event boundary (spec.md §2, §6): inbound commands in, outbound
//! events out. No transport, no wire framing — that is an external
//! collaborator's job (spec.md §1).

pub mod commands;
pub mod events;
pub mod handler;

pub use commands::{InboundCommand, TurnActionChoiceWire};
pub use events::{OutboundEvent, RoomEvent};
pub use handler::{ApiError, CommandHandler};
