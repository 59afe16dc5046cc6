//! House Cup Dashboard
//!
//! Live team leaderboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Percentage bars relative to the leading team, animated on change
//! - Time window selector (last 5 minutes, last hour, all time)
//! - Optional live updates over the backend's event stream
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. The reactive rules live in `house_cup::LeaderboardView`; this
//! crate supplies the browser backend (fetch + EventSource) and the markup.

use leptos::*;

mod api;
mod app;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
