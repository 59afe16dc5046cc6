//! App Root Component
//!
//! Provides leaderboard state, runs the first fetch, and closes the live
//! channel when the page goes away.

use leptos::*;

use crate::api;
use crate::components::Leaderboard;
use crate::state::{provide_leaderboard_state, LeaderboardState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_leaderboard_state(api::API_BASE.to_string());

    let state = use_context::<LeaderboardState>().expect("LeaderboardState not found");
    state.mount();
    on_cleanup(move || state.teardown());

    view! {
        <div class="min-h-screen bg-gray-900 text-white">
            <main class="container mx-auto max-w-2xl px-4 py-8">
                <Leaderboard />
            </main>
        </div>
    }
}
