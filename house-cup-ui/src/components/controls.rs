//! Leaderboard Controls
//!
//! Live-updates toggle, time window selector and connection indicator.

use leptos::*;

use house_cup::TimeWindow;

use crate::state::LeaderboardState;

/// Toggle button caption
pub fn toggle_label(live: bool) -> &'static str {
    if live {
        "⏸ Stop Updates"
    } else {
        "▶ Start Updates"
    }
}

/// Indicator text and color class
pub fn live_status(live: bool, connected: bool) -> (&'static str, &'static str) {
    match (live, connected) {
        (true, true) => ("Live", "text-green-400"),
        (true, false) => ("Stream stopped", "text-red-400"),
        (false, _) => ("Paused", "text-gray-400"),
    }
}

/// Toggle and window selector
#[component]
pub fn Controls() -> impl IntoView {
    let state = use_context::<LeaderboardState>().expect("LeaderboardState not found");
    let signals = state.signals;
    let toggle_state = state.clone();
    let select_state = state;

    view! {
        <div class="flex items-center space-x-3">
            <LiveIndicator />

            <button
                class="px-4 py-2 bg-indigo-600 hover:bg-indigo-700 rounded-lg font-medium transition-colors"
                on:click=move |_| toggle_state.toggle_live()
            >
                {move || toggle_label(signals.live.get())}
            </button>

            <select
                class="bg-gray-700 border border-gray-600 rounded-lg px-3 py-2"
                prop:value=move || signals.window.get().as_str()
                on:change=move |ev| {
                    match event_target_value(&ev).parse::<TimeWindow>() {
                        Ok(window) => select_state.select_window(window),
                        Err(e) => web_sys::console::error_1(&e.to_string().into()),
                    }
                }
            >
                {TimeWindow::ALL
                    .iter()
                    .map(|window| view! { <option value=window.as_str()>{window.label()}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}

/// Small dot showing whether live updates are flowing
#[component]
pub fn LiveIndicator() -> impl IntoView {
    let state = use_context::<LeaderboardState>().expect("LeaderboardState not found");
    let signals = state.signals;
    let status = move || live_status(signals.live.get(), signals.connected.get());

    view! {
        <span class=move || format!("flex items-center space-x-1 text-sm {}", status().1)>
            <span class="w-2 h-2 rounded-full bg-current" />
            <span>{move || status().0}</span>
        </span>
    }
}
