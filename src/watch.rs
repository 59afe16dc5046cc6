//! Terminal Watcher
//!
//! Native rendition of the leaderboard view. One current-thread event loop
//! owns the [`LeaderboardView`]; fetches and the push channel run as tasks,
//! stdin is read on its own thread, and all of them report back over a single
//! channel.

use std::convert::Infallible;
use std::io::{self, BufRead, BufReader, Write};
use std::str::FromStr;
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{self, ClientError, TotalsClient};
use crate::live::LinkState;
use crate::snapshot::TotalsSnapshot;
use crate::stream::{spawn_listener, ListenerHandle, StreamSignal};
use crate::view::{Backend, LeaderboardView};
use crate::window::TimeWindow;

const HELP: &str = "commands: l = start/stop updates · 5m | 1h | all = window · r = redraw · q = quit";

/// Everything the event loop reacts to
#[derive(Debug)]
pub enum WatchEvent {
    Input(String),
    InputClosed,
    Fetched {
        window: TimeWindow,
        result: Result<TotalsSnapshot, ClientError>,
    },
    Stream(StreamSignal),
}

/// A line typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleLive,
    Window(TimeWindow),
    Redraw,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "l" | "live" => Ok(Command::ToggleLive),
            "r" | "redraw" => Ok(Command::Redraw),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => other
                .parse::<TimeWindow>()
                .map(Command::Window)
                .map_err(|_| format!("unknown command '{}'", other)),
        }
    }
}

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Redraw,
    Quiet,
    Help,
    Quit,
}

/// Backend that runs fetches and listeners as tokio tasks
pub struct NativeBackend {
    client: TotalsClient,
    events: UnboundedSender<WatchEvent>,
}

impl NativeBackend {
    pub fn new(client: TotalsClient, events: UnboundedSender<WatchEvent>) -> Self {
        Self { client, events }
    }
}

impl Backend for NativeBackend {
    type Channel = ListenerHandle;
    type Error = Infallible;

    fn fetch(&mut self, window: TimeWindow) {
        let client = self.client.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = client.fetch_totals(window).await;
            let _ = events.send(WatchEvent::Fetched { window, result });
        });
    }

    fn open_stream(&mut self, generation: u64) -> Result<ListenerHandle, Infallible> {
        let events = self.events.clone();
        let url = api::stream_url(self.client.base_url());

        Ok(spawn_listener(self.client.http().clone(), url, generation, move |signal| {
            let _ = events.send(WatchEvent::Stream(signal));
        }))
    }
}

/// Watcher settings
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub base_url: String,
    pub window: TimeWindow,
    pub live: bool,
    pub bar_width: usize,
}

/// Run the watcher on stdin/stdout until the user quits
pub async fn run(options: WatchOptions) -> io::Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    spawn_line_reader(BufReader::new(io::stdin()), tx.clone())?;

    let backend = NativeBackend::new(TotalsClient::new(options.base_url), tx);
    let mut view = LeaderboardView::with_options(backend, options.window, options.live);
    view.mount();

    let mut out = io::stdout();
    writeln!(out, "{}", HELP)?;
    draw(&view, &mut out, options.bar_width)?;

    event_loop(&mut view, rx, &mut out, options.bar_width).await
}

/// Drain events until a quit, then tear the view down
pub async fn event_loop<B: Backend, W: Write>(
    view: &mut LeaderboardView<B>,
    mut events: UnboundedReceiver<WatchEvent>,
    out: &mut W,
    bar_width: usize,
) -> io::Result<()> {
    while let Some(event) = events.recv().await {
        match handle_event(view, event) {
            Step::Redraw => draw(view, out, bar_width)?,
            Step::Help => writeln!(out, "{}", HELP)?,
            Step::Quiet => {}
            Step::Quit => break,
        }
    }

    view.teardown();
    Ok(())
}

/// Apply one event to the view
pub fn handle_event<B: Backend>(view: &mut LeaderboardView<B>, event: WatchEvent) -> Step {
    match event {
        WatchEvent::Input(line) => match line.parse::<Command>() {
            Ok(Command::ToggleLive) => {
                view.toggle_live();
                Step::Redraw
            }
            Ok(Command::Window(window)) => {
                if view.select_window(window) {
                    Step::Redraw
                } else {
                    Step::Quiet
                }
            }
            Ok(Command::Redraw) => Step::Redraw,
            Ok(Command::Help) => Step::Help,
            Ok(Command::Quit) => Step::Quit,
            Err(e) => {
                tracing::warn!("{}", e);
                Step::Help
            }
        },
        WatchEvent::InputClosed => Step::Quit,
        WatchEvent::Fetched { window, result } => {
            if view.apply_fetch(window, result) {
                Step::Redraw
            } else {
                Step::Quiet
            }
        }
        WatchEvent::Stream(StreamSignal::Message { generation }) => {
            view.on_stream_message(generation);
            Step::Quiet
        }
        WatchEvent::Stream(StreamSignal::Failed { generation, error }) => {
            let was_connected = view.link_state() == LinkState::Connected;
            view.on_stream_error(generation, &error);
            if was_connected && view.link_state() == LinkState::Disconnected {
                Step::Redraw
            } else {
                Step::Quiet
            }
        }
    }
}

/// Write the current frame
pub fn draw<B: Backend, W: Write>(
    view: &LeaderboardView<B>,
    out: &mut W,
    bar_width: usize,
) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", view.render_text(bar_width))?;
    if view.live() && view.link_state() == LinkState::Disconnected {
        writeln!(out, "(live stream stopped; press l twice or change the window to reconnect)")?;
    }
    out.flush()
}

/// Forward lines from `input` as [`WatchEvent::Input`].
///
/// Blocking reads run on a plain thread that is never joined, so quitting does
/// not wait for the next line. End of input sends [`WatchEvent::InputClosed`].
pub fn spawn_line_reader<R>(input: R, events: UnboundedSender<WatchEvent>) -> io::Result<()>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("house-cup-input".into())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if events.send(WatchEvent::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::error!("stdin read failed: {}", e);
                        break;
                    }
                }
            }
            let _ = events.send(WatchEvent::InputClosed);
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Totals grow by 10 Gryff points per request; the stream sends one
    /// refresh and then ends.
    fn backend_router() -> Router {
        let hits = Arc::new(AtomicUsize::new(0));

        Router::new()
            .route(
                "/api/totals",
                get(move || {
                    let hits = Arc::clone(&hits);
                    async move {
                        let n = hits.fetch_add(1, Ordering::SeqCst) as u64 + 1;
                        Json(json!({"totals": {"Gryff": n * 10, "Slyth": 5, "Raven": 0, "Huff": 0}}))
                    }
                }),
            )
            .route(
                "/stream",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "text/event-stream")],
                        ": keep-alive\n\ndata: {\"category\":\"Gryff\"}\n\n",
                    )
                }),
            )
    }

    async fn next(rx: &mut UnboundedReceiver<WatchEvent>) -> WatchEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    /// Input that yields `first`, then blocks until `hold` is dropped
    struct HeldOpen {
        first: Option<Vec<u8>>,
        hold: std::sync::mpsc::Receiver<()>,
    }

    impl io::Read for HeldOpen {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(bytes) = self.first.take() {
                buf[..bytes.len()].copy_from_slice(&bytes);
                return Ok(bytes.len());
            }
            let _ = self.hold.recv();
            Ok(0)
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("l".parse::<Command>(), Ok(Command::ToggleLive));
        assert_eq!(" 5m ".parse::<Command>(), Ok(Command::Window(TimeWindow::FiveMinutes)));
        assert_eq!("all".parse::<Command>(), Ok(Command::Window(TimeWindow::AllTime)));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
        assert!("1d".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn test_live_refresh_cycle() {
        let base = serve(backend_router()).await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = LeaderboardView::new(NativeBackend::new(TotalsClient::new(base), tx));
        view.mount();

        // Initial fetch
        let event = next(&mut rx).await;
        assert!(matches!(event, WatchEvent::Fetched { window: TimeWindow::AllTime, .. }));
        assert_eq!(handle_event(&mut view, event), Step::Redraw);
        assert_eq!(view.snapshot().score("Gryff"), 10);

        // Start updates: one message triggers one fetch, then the stream ends
        assert_eq!(handle_event(&mut view, WatchEvent::Input("l".into())), Step::Redraw);
        assert_eq!(view.link_state(), LinkState::Connected);

        let mut fetched = 0;
        let mut failed = false;
        while !(failed && fetched == 1) {
            let event = next(&mut rx).await;
            match &event {
                WatchEvent::Fetched { .. } => fetched += 1,
                WatchEvent::Stream(StreamSignal::Failed { .. }) => failed = true,
                _ => {}
            }
            handle_event(&mut view, event);
        }

        assert_eq!(view.snapshot().score("Gryff"), 20);
        assert!(view.live());
        assert_eq!(view.link_state(), LinkState::Disconnected);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_zeros() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = TotalsClient::new(format!("http://{}", addr));
        let mut view = LeaderboardView::new(NativeBackend::new(client, tx));
        view.mount();

        let event = next(&mut rx).await;
        assert_eq!(handle_event(&mut view, event), Step::Quiet);
        assert_eq!(view.snapshot(), &TotalsSnapshot::default());
    }

    #[tokio::test]
    async fn test_event_loop_draws_and_quits() {
        let base = serve(backend_router()).await;
        let (tx, rx) = mpsc::unbounded_channel();
        let mut view =
            LeaderboardView::new(NativeBackend::new(TotalsClient::new(base), tx.clone()));

        tx.send(WatchEvent::Input("1h".into())).unwrap();
        tx.send(WatchEvent::Input("bogus".into())).unwrap();
        tx.send(WatchEvent::InputClosed).unwrap();

        let mut out = Vec::new();
        event_loop(&mut view, rx, &mut out, 10).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Last 1 hour"));
        assert!(text.contains("🦁 Gryff"));
        assert!(text.contains(HELP));
        assert_eq!(view.window(), TimeWindow::OneHour);
    }

    #[test]
    fn test_quit_does_not_wait_for_open_input() {
        let (hold, held) = std::sync::mpsc::channel::<()>();
        let input = HeldOpen {
            first: Some(b"q\n".to_vec()),
            hold: held,
        };

        let started = std::time::Instant::now();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let (tx, rx) = mpsc::unbounded_channel();
            spawn_line_reader(BufReader::new(input), tx.clone()).unwrap();

            let client = TotalsClient::new("http://127.0.0.1:9");
            let mut view = LeaderboardView::new(NativeBackend::new(client, tx));
            let mut out = Vec::new();

            tokio::time::timeout(Duration::from_secs(5), event_loop(&mut view, rx, &mut out, 10))
                .await
                .expect("q did not end the event loop")
                .unwrap();
        });

        // The reader is still blocked; shutting the runtime down must not wait for it
        drop(runtime);
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(hold);
    }

    #[tokio::test]
    async fn test_line_reader_forwards_lines_then_closes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_line_reader(io::Cursor::new("5m\nl\n"), tx).unwrap();

        assert!(matches!(next(&mut rx).await, WatchEvent::Input(line) if line == "5m"));
        assert!(matches!(next(&mut rx).await, WatchEvent::Input(line) if line == "l"));
        assert!(matches!(next(&mut rx).await, WatchEvent::InputClosed));
    }
}
