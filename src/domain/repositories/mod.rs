mod room_repository;

pub use room_repository::{RepositoryError, RoomRepository};
