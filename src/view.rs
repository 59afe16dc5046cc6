//! Leaderboard View Controller
//!
//! Explicit local state for one leaderboard instance plus the reactive rules
//! that tie it together:
//!
//! - a fetch runs whenever the selected window changes (and once on mount)
//! - the push channel is torn down and, if live, reopened whenever the live
//!   flag or the window changes
//! - every channel message fetches the *current* window
//! - a channel error closes the channel for good; live stays on
//!
//! The controller does no I/O itself. A [`Backend`] starts fetches and opens
//! channels; results come back through [`LeaderboardView::apply_fetch`] and the
//! `on_stream_*` methods.

use std::fmt;

use crate::live::{LinkState, LiveLink, PushChannel};
use crate::render::{self, BarRow};
use crate::snapshot::TotalsSnapshot;
use crate::window::TimeWindow;

/// I/O side of the view
pub trait Backend {
    type Channel: PushChannel;
    type Error: fmt::Display;

    /// Start fetching totals for `window`.
    ///
    /// Completion is reported later through [`LeaderboardView::apply_fetch`].
    fn fetch(&mut self, window: TimeWindow);

    /// Open the push channel. Its messages and errors must report `generation`.
    fn open_stream(&mut self, generation: u64) -> Result<Self::Channel, Self::Error>;
}

/// Observable state of the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub window: TimeWindow,
    pub live: bool,
    pub snapshot: TotalsSnapshot,
    pub link: LinkState,
}

/// One leaderboard instance
pub struct LeaderboardView<B: Backend> {
    backend: B,
    window: TimeWindow,
    live: bool,
    snapshot: TotalsSnapshot,
    link: LiveLink<B::Channel>,
}

impl<B: Backend> LeaderboardView<B> {
    /// Create a view on the all-time window with live updates off
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, TimeWindow::default(), false)
    }

    /// Create a view with a starting window and live flag
    pub fn with_options(backend: B, window: TimeWindow, live: bool) -> Self {
        Self {
            backend,
            window,
            live,
            snapshot: TotalsSnapshot::default(),
            link: LiveLink::new(),
        }
    }

    /// Run the initial fetch and, if live, open the channel
    pub fn mount(&mut self) {
        self.backend.fetch(self.window);
        self.resubscribe();
    }

    /// Select a window. Returns whether anything changed.
    pub fn select_window(&mut self, window: TimeWindow) -> bool {
        if window == self.window {
            return false;
        }

        tracing::info!(from = %self.window, to = %window, "window changed");
        self.window = window;
        self.backend.fetch(window);
        self.resubscribe();
        true
    }

    /// Turn live updates on or off. Returns whether anything changed.
    pub fn set_live(&mut self, live: bool) -> bool {
        if live == self.live {
            return false;
        }

        tracing::info!(live, "live updates toggled");
        self.live = live;
        self.resubscribe();
        true
    }

    pub fn toggle_live(&mut self) {
        self.set_live(!self.live);
    }

    /// A message arrived on the channel stamped `generation`
    pub fn on_stream_message(&mut self, generation: u64) {
        if !self.link.is_current(generation) {
            tracing::trace!(generation, "ignoring message from closed channel");
            return;
        }
        self.backend.fetch(self.window);
    }

    /// The channel stamped `generation` failed. It is closed and not reopened.
    pub fn on_stream_error(&mut self, generation: u64, error: impl fmt::Display) {
        if self.link.release_if_current(generation) {
            tracing::warn!(generation, error = %error, "live stream failed, updates stopped");
        }
    }

    /// Apply a finished fetch.
    ///
    /// Success replaces the snapshot wholesale; failure is logged and the
    /// previous snapshot stays. Responses are applied in arrival order, so a
    /// slow response for an old window can overwrite a newer one.
    pub fn apply_fetch<E: fmt::Display>(
        &mut self,
        window: TimeWindow,
        result: Result<TotalsSnapshot, E>,
    ) -> bool {
        match result {
            Ok(snapshot) => {
                if window != self.window {
                    tracing::debug!(
                        response = %window,
                        selected = %self.window,
                        "applying totals for a window that is no longer selected"
                    );
                }
                self.snapshot = snapshot;
                true
            }
            Err(e) => {
                tracing::error!(window = %window, error = %e, "error fetching totals");
                false
            }
        }
    }

    /// Dispose of the view's channel
    pub fn teardown(&mut self) {
        self.link.release();
    }

    fn resubscribe(&mut self) {
        self.link.release();
        if !self.live {
            return;
        }

        let backend = &mut self.backend;
        match self.link.connect(|generation| backend.open_stream(generation)) {
            Ok(generation) => tracing::info!(generation, window = %self.window, "live stream opened"),
            Err(e) => tracing::warn!(error = %e, "failed to open live stream"),
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn live(&self) -> bool {
        self.live
    }

    pub fn snapshot(&self) -> &TotalsSnapshot {
        &self.snapshot
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn state(&self) -> ViewState {
        ViewState {
            window: self.window,
            live: self.live,
            snapshot: self.snapshot.clone(),
            link: self.link.state(),
        }
    }

    /// Bars for the current snapshot
    pub fn rows(&self) -> Vec<BarRow> {
        render::bar_rows(&self.snapshot)
    }

    /// Terminal frame for the current state
    pub fn render_text(&self, width: usize) -> String {
        render::render_text(&self.snapshot, self.window, self.live, width)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
