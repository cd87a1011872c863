//! Shared wall-clock helper for the application layer's `createdAt`/
//! `turnStartTime`/`gameStartTime` fields (spec.md §3). A thin wrapper over
//! `chrono` rather than `std::time`, matching the rest of the ambient stack.

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
