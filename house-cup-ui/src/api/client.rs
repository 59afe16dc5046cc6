//! HTTP API Client
//!
//! Totals requests against the leaderboard backend.

use gloo_net::http::Request;

use house_cup::api::{parse_totals, totals_url, ApiErrorBody, DEFAULT_API_BASE};
use house_cup::{TimeWindow, TotalsSnapshot};

/// Backend base URL, fixed at build time
pub const API_BASE: &str = DEFAULT_API_BASE;

/// Fetch totals for one window
pub async fn fetch_totals(api_base: &str, window: TimeWindow) -> Result<TotalsSnapshot, String> {
    let response = Request::get(&totals_url(api_base, window))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        let status = response.status();
        let error: ApiErrorBody = response.json().await.unwrap_or(ApiErrorBody {
            error: format!("HTTP {}", status),
        });
        return Err(error.error);
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    parse_totals(&body).map_err(|e| format!("Parse error: {}", e))
}
