//! Event Stream Decoder
//!
//! Incremental decoder for `text/event-stream` bodies. Bytes can arrive in
//! arbitrary chunks; lines end in LF, CRLF or a lone CR. A leading UTF-8 BOM
//! is dropped.

use thiserror::Error;

/// Default cap on a pending line or on an event's accumulated data
pub const DEFAULT_BUFFER_LIMIT: usize = 1024 * 1024;

/// Stream contents the decoder refuses to buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Event stream line exceeds {0} bytes")]
    LineTooLong(usize),

    #[error("Event data exceeds {0} bytes")]
    EventTooLarge(usize),
}

/// One dispatched server-sent event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerEvent {
    /// Value of the `event:` field, if any
    pub event: Option<String>,
    /// Joined `data:` lines
    pub data: String,
    /// Last event ID seen on the stream
    pub id: Option<String>,
}

impl ServerEvent {
    /// Whether a browser would deliver this to `onmessage`
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("") | Some("message"))
    }
}

/// Streaming parser state
#[derive(Debug)]
pub struct EventStreamDecoder {
    line: Vec<u8>,
    limit: usize,
    started: bool,
    skip_lf: bool,
    event: Option<String>,
    data: String,
    has_data: bool,
    last_id: Option<String>,
    retry_ms: Option<u64>,
}

impl Default for EventStreamDecoder {
    fn default() -> Self {
        Self::with_limit(DEFAULT_BUFFER_LIMIT)
    }
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder that fails once a line or an event's data passes `limit` bytes
    pub fn with_limit(limit: usize) -> Self {
        Self {
            line: Vec::new(),
            limit,
            started: false,
            skip_lf: false,
            event: None,
            data: String::new(),
            has_data: false,
            last_id: None,
            retry_ms: None,
        }
    }

    /// Feed a chunk, returning every event completed by it.
    ///
    /// After an error the decoder state is unspecified; drop the stream.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<ServerEvent>, DecodeError> {
        let mut events = Vec::new();

        for &byte in chunk {
            if self.skip_lf {
                self.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\n' => self.end_line(&mut events)?,
                b'\r' => {
                    self.end_line(&mut events)?;
                    self.skip_lf = true;
                }
                _ => {
                    if self.line.len() >= self.limit {
                        return Err(DecodeError::LineTooLong(self.limit));
                    }
                    self.line.push(byte);
                }
            }
        }

        Ok(events)
    }

    /// Reconnection delay requested by the server
    pub fn retry_ms(&self) -> Option<u64> {
        self.retry_ms
    }

    fn end_line(&mut self, events: &mut Vec<ServerEvent>) -> Result<(), DecodeError> {
        let raw = std::mem::take(&mut self.line);
        let text = String::from_utf8_lossy(&raw);
        let mut line: &str = &text;
        if !self.started {
            self.started = true;
            line = line.strip_prefix('\u{FEFF}').unwrap_or(line);
        }

        if line.is_empty() {
            if let Some(event) = self.dispatch() {
                events.push(event);
            }
            return Ok(());
        }

        // Comment, e.g. keep-alive
        if line.starts_with(':') {
            return Ok(());
        }

        let (field, value) = match line.find(':') {
            Some(i) => {
                let value = &line[i + 1..];
                (&line[..i], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if self.data.len() + value.len() + 1 > self.limit {
                    return Err(DecodeError::EventTooLarge(self.limit));
                }
                self.data.push_str(value);
                self.data.push('\n');
                self.has_data = true;
            }
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    self.retry_ms = value.parse().ok();
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn dispatch(&mut self) -> Option<ServerEvent> {
        let event = self.event.take();
        if !self.has_data {
            return None;
        }

        self.has_data = false;
        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }

        Some(ServerEvent {
            event,
            data,
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> Vec<ServerEvent> {
        let mut decoder = EventStreamDecoder::new();
        chunks.iter().flat_map(|c| decoder.feed(c).unwrap()).collect()
    }

    #[test]
    fn test_single_event() {
        let events = decode_all(&[b"data: {\"category\":\"Gryff\"}\n\n"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"category\":\"Gryff\"}");
        assert!(events[0].is_message());
    }

    #[test]
    fn test_keep_alive_comment_ignored() {
        let events = decode_all(&[b": keep-alive\n\n", b"data: x\n\n"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn test_multiline_data() {
        let events = decode_all(&[b"data: one\ndata:two\ndata\n\n"]);
        assert_eq!(events[0].data, "one\ntwo\n");
    }

    #[test]
    fn test_chunk_boundaries() {
        let events = decode_all(&[b"da", b"ta: hel", b"lo\n", b"\n", b"data: again\n\n"]);
        let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, vec!["hello", "again"]);
    }

    #[test]
    fn test_line_endings() {
        let crlf = decode_all(&[b"data: a\r\n\r\ndata: b\r", b"\n\r\n"]);
        assert_eq!(crlf.iter().map(|e| e.data.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);

        let cr = decode_all(&[b"data: a\r\rdata: b\r\r"]);
        assert_eq!(cr.iter().map(|e| e.data.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_named_event_is_not_message() {
        let events = decode_all(&[b"event: ping\ndata: 1\n\nevent: message\ndata: 2\n\n"]);
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_message());
        assert_eq!(events[0].event.as_deref(), Some("ping"));
        assert!(events[1].is_message());
    }

    #[test]
    fn test_no_data_no_dispatch() {
        let events = decode_all(&[b"event: foo\n\n", b"id: 7\n\n", b"data: z\n\n"]);
        assert_eq!(events.len(), 1);
        // Event type was reset by the empty dispatch
        assert!(events[0].is_message());
        assert_eq!(events[0].id.as_deref(), Some("7"));
    }

    #[test]
    fn test_retry_field() {
        let mut decoder = EventStreamDecoder::new();
        decoder.feed(b"retry: 3000\n\nretry: soon\n\n").unwrap();
        assert_eq!(decoder.retry_ms(), Some(3000));
    }

    #[test]
    fn test_incomplete_event_is_held() {
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder.feed(b"data: pending\n").unwrap().is_empty());
        assert_eq!(decoder.feed(b"\n").unwrap().len(), 1);
    }

    #[test]
    fn test_leading_bom_stripped() {
        let events = decode_all(&[b"\xEF\xBB\xBFdata: first\n\n", b"data: second\n\n"]);
        let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, vec!["first", "second"]);
    }

    #[test]
    fn test_bom_split_across_chunks() {
        let events = decode_all(&[b"\xEF", b"\xBB\xBFda", b"ta: x\n\n"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn test_bom_only_stripped_at_start() {
        let events = decode_all(&[b"data: a\n\n\xEF\xBB\xBFdata: b\n\n"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "a");
    }

    #[test]
    fn test_line_limit() {
        let mut decoder = EventStreamDecoder::with_limit(16);
        assert!(decoder.feed(b": short comment\n").is_ok());
        let err = decoder.feed(&[b'x'; 32]).unwrap_err();
        assert_eq!(err, DecodeError::LineTooLong(16));
    }

    #[test]
    fn test_event_data_limit() {
        let mut decoder = EventStreamDecoder::with_limit(16);
        assert!(decoder.feed(b"data: 0123456\n").unwrap().is_empty());
        let err = decoder.feed(b"data: 0123456\ndata: 0123456\n").unwrap_err();
        assert_eq!(err, DecodeError::EventTooLarge(16));
    }
}
