//! Use cases: one struct per inbound command, each generic over the
//! `RoomRepository` seam (spec.md §4).

pub mod game;
pub mod party;
pub mod time;
