//! Time Windows
//!
//! The closed set of ranges the totals API aggregates over.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Time range filter applied to aggregated totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    /// Last 5 minutes
    #[serde(rename = "5m")]
    FiveMinutes,
    /// Last hour
    #[serde(rename = "1h")]
    OneHour,
    /// Everything recorded
    #[default]
    #[serde(rename = "all")]
    AllTime,
}

impl TimeWindow {
    /// All windows, in selector order
    pub const ALL: [TimeWindow; 3] = [
        TimeWindow::FiveMinutes,
        TimeWindow::OneHour,
        TimeWindow::AllTime,
    ];

    /// Value sent as the `window` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::FiveMinutes => "5m",
            TimeWindow::OneHour => "1h",
            TimeWindow::AllTime => "all",
        }
    }

    /// Human-readable label for selectors and headers
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::FiveMinutes => "Last 5 minutes",
            TimeWindow::OneHour => "Last 1 hour",
            TimeWindow::AllTime => "All Time",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown window value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown window '{0}', expected one of 5m|1h|all")]
pub struct ParseWindowError(pub String);

impl FromStr for TimeWindow {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5m" => Ok(TimeWindow::FiveMinutes),
            "1h" => Ok(TimeWindow::OneHour),
            "all" => Ok(TimeWindow::AllTime),
            other => Err(ParseWindowError(other.to_string())),
        }
    }
}
