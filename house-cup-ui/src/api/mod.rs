//! Backend API access from the browser

mod client;

pub use client::{fetch_totals, API_BASE};
