//! Client side of the WMS document API.
//!
//! The tracker only talks to the backend through [`DocumentBackend`], so tests
//! can swap in a scripted implementation.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::fmt;

use crate::models::catalog::DocumentCatalog;
use crate::models::document::DocumentKey;

pub use http::HttpBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Connection, timeout or other failure before a status line was read.
    Transport(String),
    /// Non-2xx response. `body` is the response text, possibly empty.
    Status { status: u16, body: String },
    /// 2xx response whose body could not be read or parsed.
    Decode(String),
}

impl BackendError {
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Status { body, .. } if !body.trim().is_empty() => Some(body.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(e) => write!(f, "transport error: {e}"),
            BackendError::Status { status, body } if body.trim().is_empty() => {
                write!(f, "backend returned HTTP {status}")
            }
            BackendError::Status { status, body } => {
                write!(f, "backend returned HTTP {status}: {}", body.trim())
            }
            BackendError::Decode(e) => write!(f, "invalid response body: {e}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// JSON body of `POST /documents/{category}/{type}/sign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignRequest {
    /// Encoded signature image, typically a `data:image/png;base64,...` URL.
    pub signature: String,
    pub signer_name: String,
}

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Render the unsigned document. Returns the PDF bytes.
    async fn generate(&self, key: &DocumentKey) -> Result<Bytes, BackendError>;

    /// Submit a signature. Returns the signed PDF bytes.
    async fn sign(&self, key: &DocumentKey, request: &SignRequest) -> Result<Bytes, BackendError>;

    /// List the document types the backend can render.
    async fn catalog(&self) -> Result<DocumentCatalog, BackendError>;
}
