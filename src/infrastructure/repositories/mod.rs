mod in_memory_room_repository;

pub use in_memory_room_repository::InMemoryRoomRepository;
