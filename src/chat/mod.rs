//! Chat widget: streamed replies from the Portal backend.
//!
//! - `stream` - incremental parser for the `/stream` response body
//! - `backend` - HTTP transport (`ChatBackend` trait, reqwest implementation)
//! - `controller` - `ChatController`, driving any `ChatSurface`
mod backend;
mod controller;
mod stream;

pub use backend::{ByteStream, ChatBackend, ChatError, ChatRequest, ChatResult, HttpChatBackend};
pub use controller::{
    CONNECTION_ERROR, ChatController, ChatSurface, FALLBACK_REPLY, GREETING, InputLock,
    SendOutcome,
};
pub use stream::{DEFAULT_STREAM_ERROR, EventParser, StreamEvent};
