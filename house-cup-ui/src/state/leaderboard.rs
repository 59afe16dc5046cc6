//! Leaderboard State
//!
//! Runs the shared [`LeaderboardView`] controller in the browser and mirrors
//! its state into signals for rendering.

use leptos::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;

use house_cup::api::stream_url;
use house_cup::{Backend, LeaderboardView, LinkState, TimeWindow, TotalsSnapshot};

use super::EventSourceHandle;
use crate::api;

type SharedView = Rc<RefCell<LeaderboardView<WebBackend>>>;

/// Render-side copy of the controller state
#[derive(Clone, Copy)]
pub struct Signals {
    pub window: RwSignal<TimeWindow>,
    pub live: RwSignal<bool>,
    pub snapshot: RwSignal<TotalsSnapshot>,
    pub connected: RwSignal<bool>,
}

impl Signals {
    fn new() -> Self {
        Self {
            window: create_rw_signal(TimeWindow::default()),
            live: create_rw_signal(false),
            snapshot: create_rw_signal(TotalsSnapshot::default()),
            connected: create_rw_signal(false),
        }
    }

    fn sync(&self, view: &LeaderboardView<WebBackend>) {
        let state = view.state();
        set_if_changed(self.window, state.window);
        set_if_changed(self.live, state.live);
        set_if_changed(self.snapshot, state.snapshot);
        set_if_changed(self.connected, state.link == LinkState::Connected);
    }
}

fn set_if_changed<T: PartialEq + 'static>(signal: RwSignal<T>, value: T) {
    // Signals are gone once the page's owner is disposed.
    if signal.try_with_untracked(|current| current != &value).unwrap_or(false) {
        let _ = signal.try_set(value);
    }
}

/// Console text for a failed totals request
pub fn fetch_error_message(window: TimeWindow, error: &str) -> String {
    format!("Error fetching totals ({}): {}", window, error)
}

/// Browser backend: fetches with gloo-net, listens with EventSource.
///
/// Completions are applied to the controller from a fresh task, never from
/// inside the call that started them.
pub struct WebBackend {
    view: Weak<RefCell<LeaderboardView<WebBackend>>>,
    signals: Signals,
    api_base: String,
}

impl WebBackend {
    fn with_view(
        view: &Weak<RefCell<LeaderboardView<WebBackend>>>,
        signals: Signals,
        f: impl FnOnce(&mut LeaderboardView<WebBackend>),
    ) {
        if let Some(view) = view.upgrade() {
            let mut view = view.borrow_mut();
            f(&mut view);
            signals.sync(&view);
        }
    }
}

impl Backend for WebBackend {
    type Channel = EventSourceHandle;
    type Error = String;

    fn fetch(&mut self, window: TimeWindow) {
        let view = self.view.clone();
        let signals = self.signals;
        let api_base = self.api_base.clone();

        spawn_local(async move {
            let result = api::fetch_totals(&api_base, window).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&fetch_error_message(window, e).into());
            }
            WebBackend::with_view(&view, signals, |view| {
                view.apply_fetch(window, result);
            });
        });
    }

    fn open_stream(&mut self, generation: u64) -> Result<EventSourceHandle, String> {
        let url = stream_url(&self.api_base);

        let on_message = {
            let view = self.view.clone();
            let signals = self.signals;
            move || {
                let view = view.clone();
                spawn_local(async move {
                    WebBackend::with_view(&view, signals, |view| {
                        view.on_stream_message(generation);
                    });
                });
            }
        };

        // Closing the source drops this callback, so release from a task.
        let on_error = {
            let view = self.view.clone();
            let signals = self.signals;
            move || {
                let view = view.clone();
                spawn_local(async move {
                    WebBackend::with_view(&view, signals, |view| {
                        view.on_stream_error(generation, "event stream error");
                    });
                });
            }
        };

        EventSourceHandle::open(&url, on_message, on_error)
    }
}

/// Handle to the page's leaderboard, shared through context
#[derive(Clone)]
pub struct LeaderboardState {
    view: SharedView,
    pub signals: Signals,
}

impl LeaderboardState {
    pub fn new(api_base: String) -> Self {
        let signals = Signals::new();
        let view = Rc::new_cyclic(|weak: &Weak<RefCell<LeaderboardView<WebBackend>>>| {
            RefCell::new(LeaderboardView::new(WebBackend {
                view: weak.clone(),
                signals,
                api_base,
            }))
        });

        Self { view, signals }
    }

    /// Initial fetch (and subscription, if live)
    pub fn mount(&self) {
        self.update(|view| view.mount());
    }

    pub fn select_window(&self, window: TimeWindow) {
        self.update(|view| {
            view.select_window(window);
        });
    }

    pub fn toggle_live(&self) {
        self.update(|view| view.toggle_live());
    }

    /// Close the push channel; late fetch results are still accepted
    pub fn teardown(&self) {
        self.view.borrow_mut().teardown();
    }

    fn update(&self, f: impl FnOnce(&mut LeaderboardView<WebBackend>)) {
        let mut view = self.view.borrow_mut();
        f(&mut view);
        self.signals.sync(&view);
    }
}

/// Provide leaderboard state to the component tree
pub fn provide_leaderboard_state(api_base: String) {
    provide_context(LeaderboardState::new(api_base));
}
