use crate::config::Settings;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error {status}: {body}")]
    Status { status: u16, body: String },
}

pub type ChatResult<T> = Result<T, ChatError>;

/// Raw response body, chunked as the transport delivers it.
pub type ByteStream = BoxStream<'static, ChatResult<Vec<u8>>>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Start a streamed reply. Non-2xx statuses are errors.
    async fn open_stream(&self, request: &ChatRequest) -> ChatResult<ByteStream>;

    /// Ask the backend to forget a session.
    ///
    /// Best-effort: failures are logged and swallowed, never retried.
    async fn discard_session(&self, session_id: &str);
}

#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    api_base: String,
}

impl HttpChatBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            api_base,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.chat_api_base.clone())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `{api_base}/session/{id}` with the id escaped as a single path segment.
    fn session_url(&self, session_id: &str) -> Option<Url> {
        let mut url = Url::parse(&self.api_base).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("session")
            .push(session_id);
        Some(url)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn open_stream(&self, request: &ChatRequest) -> ChatResult<ByteStream> {
        let response = self
            .client
            .post(format!("{}/stream", self.api_base))
            .header("accept", "text/event-stream")
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response
            .bytes_stream()
            .map(|item| item.map(|bytes| bytes.to_vec()).map_err(ChatError::from))
            .boxed())
    }

    async fn discard_session(&self, session_id: &str) {
        let Some(url) = self.session_url(session_id) else {
            debug!(session_id, api_base = %self.api_base, "cannot build session url, skipping teardown");
            return;
        };
        match self.client.delete(url).send().await {
            Ok(response) => debug!(session_id, status = %response.status(), "session discarded"),
            Err(err) => debug!(session_id, %err, "session teardown failed, ignoring"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_null_session() {
        let request = ChatRequest {
            message: "oi".to_string(),
            session_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "message": "oi", "session_id": null })
        );
    }

    #[test]
    fn strips_trailing_slash_from_base() {
        let backend = HttpChatBackend::new("http://localhost:8000/api/chat/");
        assert_eq!(backend.api_base(), "http://localhost:8000/api/chat");
    }

    #[test]
    fn session_id_is_escaped_as_one_segment() {
        let backend = HttpChatBackend::new("http://localhost:8000/api/chat/");
        let url = backend.session_url("a/b?c#d").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/chat/session/a%2Fb%3Fc%23d"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn unparsable_base_has_no_session_url() {
        let backend = HttpChatBackend::new("not a url");
        assert!(backend.session_url("abc").is_none());
    }
}
