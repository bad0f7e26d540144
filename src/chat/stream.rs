//! Incremental parser for the `/stream` response body.
//!
//! The backend writes server-sent-event style lines:
//!
//! ```text
//! data: {"token": "Hel"}
//!
//! data: {"token": "lo"}
//!
//! event: done
//! data: {"session_id": "2f0c..."}
//! ```
//!
//! Chunks can split lines (and UTF-8 sequences) anywhere, so the parser keeps
//! the unterminated tail of each chunk and only decodes complete lines.

use serde_json::{Map, Value};
use tracing::{debug, trace};

const DATA_PREFIX: &str = "data:";
const EVENT_PREFIX: &str = "event:";

/// Used when an `event: error` marker arrives without a readable message.
pub const DEFAULT_STREAM_ERROR: &str = "The server reported an error while generating the reply.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Token(String),
    SessionAssigned(String),
    Done,
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Done,
    Error,
}

impl Marker {
    fn bare_event(self) -> StreamEvent {
        match self {
            Marker::Done => StreamEvent::Done,
            Marker::Error => StreamEvent::Error(DEFAULT_STREAM_ERROR.to_string()),
        }
    }
}

fn string_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Fields are read one by one so a wrong-typed sibling cannot hide a token.
fn dispatch(payload: &Map<String, Value>, marker: Option<Marker>, events: &mut Vec<StreamEvent>) {
    if marker == Some(Marker::Error) {
        let message = string_field(payload, "error")
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STREAM_ERROR.to_string());
        events.push(StreamEvent::Error(message));
        return;
    }

    if let Some(token) = string_field(payload, "token") {
        events.push(StreamEvent::Token(token));
    }
    if let Some(id) = string_field(payload, "session_id") {
        events.push(StreamEvent::SessionAssigned(id));
    }
    if marker == Some(Marker::Done) {
        events.push(StreamEvent::Done);
    }
}

/// Longest unterminated line kept in memory; anything past it is dropped.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug)]
pub struct EventParser {
    pending: Vec<u8>,
    marker: Option<Marker>,
    max_line_bytes: usize,
    // Skipping the rest of an oversized line until its `\n`.
    discarding: bool,
}

impl Default for EventParser {
    fn default() -> Self {
        Self::with_max_line_bytes(MAX_LINE_BYTES)
    }
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_bytes(max_line_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            marker: None,
            max_line_bytes,
            discarding: false,
        }
    }

    /// Feed one chunk of the body and return the events completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut chunk = chunk;
        if self.discarding {
            match chunk.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    chunk = &chunk[pos + 1..];
                    self.discarding = false;
                }
                None => return Vec::new(),
            }
        }
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            let line = String::from_utf8_lossy(&self.pending[start..end]).into_owned();
            start = end + 1;
            self.process_line(&line, &mut events);
        }
        self.pending.drain(..start);

        if self.pending.len() > self.max_line_bytes {
            debug!(
                bytes = self.pending.len(),
                limit = self.max_line_bytes,
                "dropping oversized stream line"
            );
            self.pending.clear();
            self.discarding = true;
        }
        events
    }

    /// Signal end of stream: the unterminated tail counts as a last line.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        self.discarding = false;
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&tail).into_owned();
            self.process_line(&line, &mut events);
        }
        self.flush_marker(&mut events);
        events
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<StreamEvent>) {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            self.flush_marker(events);
            return;
        }

        if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
            self.flush_marker(events);
            self.marker = match name.trim() {
                "done" => Some(Marker::Done),
                "error" => Some(Marker::Error),
                other => {
                    trace!(event = other, "ignoring unknown stream event");
                    None
                }
            };
            return;
        }

        if let Some(data) = line.strip_prefix(DATA_PREFIX) {
            let data = data.strip_prefix(' ').unwrap_or(data);
            let marker = self.marker.take();
            match serde_json::from_str::<Value>(data) {
                Ok(Value::Object(payload)) => dispatch(&payload, marker, events),
                Ok(_) => {
                    debug!(line = data, "dropping non-object stream payload");
                    if let Some(marker) = marker {
                        events.push(marker.bare_event());
                    }
                }
                Err(err) => {
                    debug!(%err, line = data, "dropping malformed stream line");
                    if let Some(marker) = marker {
                        events.push(marker.bare_event());
                    }
                }
            }
        }
    }

    fn flush_marker(&mut self, events: &mut Vec<StreamEvent>) {
        if let Some(marker) = self.marker.take() {
            events.push(marker.bare_event());
        }
    }
}
