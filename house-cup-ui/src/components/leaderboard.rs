//! Leaderboard Component
//!
//! Header, controls and one bar per team in registry order.

use leptos::*;

use house_cup::{bar_rows, TEAMS};

use crate::components::{Controls, TeamBar};
use crate::state::LeaderboardState;

#[component]
pub fn Leaderboard() -> impl IntoView {
    let state = use_context::<LeaderboardState>().expect("LeaderboardState not found");
    let signals = state.signals;
    let rows = create_memo(move |_| signals.snapshot.with(bar_rows));

    view! {
        <section class="bg-gray-800 rounded-lg p-6 border border-gray-700">
            <div class="flex flex-wrap items-center justify-between gap-4 mb-6">
                <div>
                    <h1 class="text-2xl font-bold">"📊 Live Leaderboard"</h1>
                    <p class="text-gray-400 text-sm">{move || signals.window.get().label()}</p>
                </div>
                <Controls />
            </div>

            <div class="space-y-4">
                {(0..TEAMS.len())
                    .map(|i| {
                        let row = Signal::derive(move || rows.with(|rows| rows[i].clone()));
                        view! { <TeamBar row=row /> }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
