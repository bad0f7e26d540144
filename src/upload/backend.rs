use crate::config::Settings;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Multipart field name the backend reads the file from.
pub const FILE_FIELD: &str = "csvFile";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub data: Vec<u8>,
}

/// A file chosen in the picker before its contents are read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePick {
    pub name: String,
    pub size: u64,
}

impl FilePick {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            data,
        }
    }
}

/// What the backend says about a processed upload. Every field is optional;
/// an unexpected JSON shape yields the default receipt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub rows_processed: Option<u64>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("backend unreachable: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("HTTP error {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("invalid response: {0}")]
    Response(String),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            UploadError::Connection(err)
        } else {
            UploadError::Transport(err)
        }
    }
}

#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReceipt, UploadError>;
}

#[derive(Clone)]
pub struct HttpUploadBackend {
    client: Client,
    url: String,
}

impl HttpUploadBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.upload_url.clone())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// FastAPI puts the reason under `detail`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl UploadBackend for HttpUploadBackend {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReceipt, UploadError> {
        let part = Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|err| UploadError::Response(err.to_string()))?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}
