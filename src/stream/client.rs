//! Event Stream Client
//!
//! Reads the backend's push channel over HTTP and turns it into refresh
//! signals for the view.

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Client;
use std::collections::VecDeque;
use thiserror::Error;
use tokio::task::JoinHandle;

use super::decoder::{DecodeError, EventStreamDecoder, ServerEvent};
use crate::live::PushChannel;

/// Errors that end a push channel
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Connect failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Unexpected content type '{0}'")]
    ContentType(String),

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Malformed stream: {0}")]
    Decode(#[from] DecodeError),

    #[error("Stream closed by server")]
    Closed,
}

/// An open `text/event-stream` response
pub struct EventStream {
    body: BoxStream<'static, Result<Vec<u8>, reqwest::Error>>,
    decoder: EventStreamDecoder,
    pending: VecDeque<ServerEvent>,
}

impl EventStream {
    /// Open the stream at `url`
    pub async fn connect(client: &Client, url: &str) -> Result<Self, StreamError> {
        let response = client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(StreamError::Connect)?;

        if !response.status().is_success() {
            return Err(StreamError::Status(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("text/event-stream") {
            return Err(StreamError::ContentType(content_type));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(Self {
            body,
            decoder: EventStreamDecoder::new(),
            pending: VecDeque::new(),
        })
    }

    /// Wait for the next event of any type
    pub async fn next_event(&mut self) -> Result<ServerEvent, StreamError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.decoder.feed(&chunk)?),
                Some(Err(e)) => return Err(StreamError::Transport(e)),
                None => return Err(StreamError::Closed),
            }
        }
    }
}

/// What a listener reports back to its owner
#[derive(Debug)]
pub enum StreamSignal {
    /// A message event arrived; payload is irrelevant
    Message { generation: u64 },
    /// The channel ended and will not be retried
    Failed { generation: u64, error: StreamError },
}

/// Background reader for one push channel. Closing aborts the reader.
pub struct ListenerHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl PushChannel for ListenerHandle {
    fn close(&mut self) {
        self.task.abort();
    }
}

/// Spawn a reader for `url` that reports every message event and the final
/// failure through `report`
pub fn spawn_listener<F>(client: Client, url: String, generation: u64, mut report: F) -> ListenerHandle
where
    F: FnMut(StreamSignal) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut stream = match EventStream::connect(&client, &url).await {
            Ok(stream) => stream,
            Err(error) => {
                report(StreamSignal::Failed { generation, error });
                return;
            }
        };
        tracing::debug!(generation, url = %url, "event stream connected");

        loop {
            match stream.next_event().await {
                Ok(event) if event.is_message() => report(StreamSignal::Message { generation }),
                Ok(event) => {
                    tracing::trace!(generation, event = ?event.event, "ignoring named event");
                }
                Err(error) => {
                    report(StreamSignal::Failed { generation, error });
                    return;
                }
            }
        }
    });

    ListenerHandle { generation, task }
}
