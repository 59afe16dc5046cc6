//! UI Components
//!
//! Leptos components for the leaderboard page.

pub mod controls;
pub mod leaderboard;
pub mod team_bar;

pub use controls::Controls;
pub use leaderboard::Leaderboard;
pub use team_bar::TeamBar;
