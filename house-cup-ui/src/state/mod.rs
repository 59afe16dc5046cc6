//! State Management
//!
//! Leaderboard controller wiring and the live event-stream channel.

pub mod event_source;
pub mod leaderboard;

pub use event_source::EventSourceHandle;
pub use leaderboard::{provide_leaderboard_state, LeaderboardState};
