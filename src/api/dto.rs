//! Data Transfer Objects
//!
//! Wire types and endpoint paths of the totals API.
//! Shared by the native client and the browser view.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::snapshot::{Score, TotalsSnapshot};
use crate::window::TimeWindow;

/// Default API base URL (local backend)
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

pub const TOTALS_PATH: &str = "/api/totals";
pub const STREAM_PATH: &str = "/stream";
pub const INGEST_PATH: &str = "/api/ingest";

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// `GET {base}/api/totals?window={window}`
pub fn totals_url(base: &str, window: TimeWindow) -> String {
    format!("{}?window={}", join(base, TOTALS_PATH), window.as_str())
}

/// `GET {base}/stream`
pub fn stream_url(base: &str) -> String {
    join(base, STREAM_PATH)
}

/// `POST {base}/api/ingest`
pub fn ingest_url(base: &str) -> String {
    join(base, INGEST_PATH)
}

// ============================================
// TOTALS
// ============================================

/// Totals response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsResponse {
    /// Team name → points in the requested window
    pub totals: HashMap<String, Score>,
}

impl TotalsResponse {
    pub fn into_snapshot(self) -> TotalsSnapshot {
        TotalsSnapshot::from_totals(self.totals)
    }
}

/// Parse a totals body straight into a snapshot
pub fn parse_totals(body: &str) -> Result<TotalsSnapshot, serde_json::Error> {
    serde_json::from_str::<TotalsResponse>(body).map(TotalsResponse::into_snapshot)
}

// ============================================
// INGEST
// ============================================

/// A points award posted to the ingest endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Unique event ID; the server ignores duplicates
    pub id: String,
    /// Team name
    pub category: String,
    /// Points awarded
    pub points: u32,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Error body returned by the API on 4xx
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
