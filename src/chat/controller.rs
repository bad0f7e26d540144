use super::backend::{ChatBackend, ChatRequest, ChatResult};
use super::stream::{EventParser, StreamEvent};
use crate::types::Role;
use futures::StreamExt;
use std::ops::{ControlFlow, Deref, DerefMut};
use tracing::{debug, error, warn};

pub const GREETING: &str = "Hello! I'm the Portal TCC assistant. I can answer questions about the CSV data loaded into the system. How can I help?";
pub const FALLBACK_REPLY: &str = "No response could be generated.";
pub const CONNECTION_ERROR: &str =
    "Error communicating with the server. Check that the backend is running.";

/// What the chat page has to offer the controller.
pub trait ChatSurface {
    /// Add a bubble and return its index for later updates.
    fn append_message(&mut self, role: Role, text: &str) -> usize;
    fn set_message_text(&mut self, index: usize, text: &str);
    fn show_typing(&mut self);
    /// Must be a no-op when no indicator is shown.
    fn hide_typing(&mut self);
    fn scroll_to_bottom(&mut self);
    fn set_input_enabled(&mut self, enabled: bool);
    fn clear_input(&mut self);
    fn focus_input(&mut self);
    fn clear_messages(&mut self);
}

/// Keeps the input disabled while alive. Dropping it (on any path, including
/// a cancelled future) re-enables and focuses the input.
pub struct InputLock<'a, S: ChatSurface> {
    surface: &'a mut S,
}

impl<'a, S: ChatSurface> InputLock<'a, S> {
    pub fn acquire(surface: &'a mut S) -> Self {
        surface.set_input_enabled(false);
        Self { surface }
    }
}

impl<S: ChatSurface> Deref for InputLock<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: ChatSurface> DerefMut for InputLock<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: ChatSurface> Drop for InputLock<'_, S> {
    fn drop(&mut self) {
        self.surface.set_input_enabled(true);
        self.surface.focus_input();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing sent.
    Ignored,
    Completed { reply: String },
    /// The stream ended with an `event: error` from the server.
    ServerError { reply: String, message: String },
    /// Connection, status or read failure.
    Failed,
}

#[derive(Debug, Default)]
struct StreamedReply {
    text: String,
    server_error: Option<String>,
}

pub struct ChatController<B> {
    backend: B,
    session: Option<String>,
}

impl<B: ChatBackend> ChatController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn send_message<S: ChatSurface>(&mut self, surface: &mut S, text: &str) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }

        surface.clear_input();
        let mut view = InputLock::acquire(surface);
        view.append_message(Role::User, message);
        view.show_typing();

        match self.stream_reply(&mut *view, message).await {
            Ok(StreamedReply {
                text,
                server_error: None,
            }) => SendOutcome::Completed { reply: text },
            Ok(StreamedReply {
                text,
                server_error: Some(reason),
            }) => {
                warn!(%reason, "server reported a stream error");
                view.append_message(Role::Error, &reason);
                SendOutcome::ServerError {
                    reply: text,
                    message: reason,
                }
            }
            Err(err) => {
                error!(%err, "chat request failed");
                view.hide_typing();
                view.append_message(Role::Error, CONNECTION_ERROR);
                SendOutcome::Failed
            }
        }
    }

    async fn stream_reply<S: ChatSurface>(
        &mut self,
        surface: &mut S,
        message: &str,
    ) -> ChatResult<StreamedReply> {
        let request = ChatRequest {
            message: message.to_string(),
            session_id: self.session.clone(),
        };
        let mut body = self.backend.open_stream(&request).await?;

        surface.hide_typing();
        let bubble = surface.append_message(Role::Bot, "");
        let mut parser = EventParser::new();
        let mut reply = StreamedReply::default();
        let mut terminated = false;

        'read: while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for event in parser.feed(&chunk) {
                if self.apply(event, surface, bubble, &mut reply).is_break() {
                    terminated = true;
                    break 'read;
                }
            }
        }

        if !terminated {
            for event in parser.finish() {
                if self.apply(event, surface, bubble, &mut reply).is_break() {
                    break;
                }
            }
        }

        if reply.text.is_empty() {
            surface.set_message_text(bubble, FALLBACK_REPLY);
        }
        Ok(reply)
    }

    fn apply<S: ChatSurface>(
        &mut self,
        event: StreamEvent,
        surface: &mut S,
        bubble: usize,
        reply: &mut StreamedReply,
    ) -> ControlFlow<()> {
        match event {
            StreamEvent::Token(piece) => {
                reply.text.push_str(&piece);
                surface.set_message_text(bubble, &reply.text);
                surface.scroll_to_bottom();
                ControlFlow::Continue(())
            }
            StreamEvent::SessionAssigned(id) => {
                debug!(session_id = %id, "session assigned");
                self.session = Some(id);
                ControlFlow::Continue(())
            }
            StreamEvent::Done => ControlFlow::Break(()),
            StreamEvent::Error(message) => {
                reply.server_error = Some(message);
                ControlFlow::Break(())
            }
        }
    }

    /// Forget the conversation locally and, if there is one, remotely.
    pub async fn clear_session<S: ChatSurface>(&mut self, surface: &mut S) {
        if let Some(id) = self.session.take() {
            self.backend.discard_session(&id).await;
        }
        surface.clear_messages();
        surface.append_message(Role::Bot, GREETING);
        surface.focus_input();
    }
}
