//! # House Cup
//!
//! Live leaderboard for four teams. Totals come from the backend for a
//! selected time window and are drawn as percentage bars relative to the
//! leading team.
//!
//! ## Modules
//!
//! - [`teams`]: Fixed team registry (order, names, icons)
//! - [`window`]: Time windows accepted by the totals endpoint
//! - [`snapshot`]: Last known totals
//! - [`render`]: Percent math, score formatting and bar rows
//! - [`live`]: Exclusive ownership of the push channel
//! - [`view`]: Leaderboard controller (fetch on window change, live updates)
//! - [`api`]: Totals/ingest endpoints and the HTTP client
//! - [`stream`]: Event-stream decoding and the background listener
//!
//! With the default `client` feature the crate also ships the terminal
//! watcher ([`watch`]), the points feed ([`feed`]), configuration and
//! logging. Without it the core builds for `wasm32` and backs the browser view.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use house_cup::watch::{self, WatchOptions};
//! use house_cup::TimeWindow;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::io::Result<()> {
//!     watch::run(WatchOptions {
//!         base_url: "http://localhost:5000".into(),
//!         window: TimeWindow::OneHour,
//!         live: true,
//!         bar_width: 40,
//!     })
//!     .await
//! }
//! ```

pub mod api;
pub mod live;
pub mod render;
pub mod snapshot;
pub mod stream;
pub mod teams;
pub mod view;
pub mod window;

#[cfg(feature = "client")]
pub mod config;
#[cfg(feature = "client")]
pub mod feed;
#[cfg(feature = "client")]
pub mod logging;
#[cfg(feature = "client")]
pub mod watch;

// Re-export top-level types for convenience
pub use teams::{find_team, Team, TEAMS};

pub use window::{ParseWindowError, TimeWindow};

pub use snapshot::{Score, TotalsSnapshot};

pub use render::{bar_rows, format_score, percent_of, render_text, text_bar, BarRow};

pub use live::{LinkState, LiveLink, PushChannel};

pub use view::{Backend, LeaderboardView, ViewState};

pub use stream::{EventStreamDecoder, ServerEvent};

#[cfg(feature = "client")]
pub use api::{ClientError, TotalsClient};

#[cfg(feature = "client")]
pub use config::{Config, ConfigError, LoggingConfig};
