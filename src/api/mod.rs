//! Leaderboard API
//!
//! Client side of the backend's HTTP interface.
//!
//! # Endpoints
//!
//! - `GET /api/totals?window={5m|1h|all}` - Team totals for a window
//! - `GET /stream` - Push channel, see [`crate::stream`]
//! - `POST /api/ingest` - Record a points award (used by the feed)

pub mod dto;

#[cfg(feature = "client")]
mod client;

pub use dto::{
    ingest_url, parse_totals, stream_url, totals_url, ApiErrorBody, IngestRequest,
    TotalsResponse, DEFAULT_API_BASE,
};

#[cfg(feature = "client")]
pub use client::{ClientError, TotalsClient};
