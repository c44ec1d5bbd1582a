use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use std::time::Duration;

use super::{BackendError, DocumentBackend, SignRequest};
use crate::models::catalog::DocumentCatalog;
use crate::models::document::DocumentKey;

/// `DocumentBackend` over the WMS REST API.
pub struct HttpBackend {
    client: Client,
    /// Base URL including the `/api` prefix, without trailing slash.
    api_base: String,
}

impl HttpBackend {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, api_base))
    }

    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { client, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn document_url(&self, key: &DocumentKey) -> String {
        format!("{}/documents/{}/{}", self.api_base, key.category, key.document_type)
    }

    pub fn sign_url(&self, key: &DocumentKey) -> String {
        format!("{}/sign", self.document_url(key))
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/documents/available", self.api_base)
    }
}

/// Turn a non-2xx response into `BackendError::Status`, keeping the body text.
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_bytes(response: Response) -> Result<Bytes, BackendError> {
    response
        .bytes()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

fn transport(e: reqwest::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn generate(&self, key: &DocumentKey) -> Result<Bytes, BackendError> {
        let url = self.document_url(key);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await.map_err(transport)?;
        read_bytes(check_status(response).await?).await
    }

    async fn sign(&self, key: &DocumentKey, request: &SignRequest) -> Result<Bytes, BackendError> {
        let url = self.sign_url(key);
        log::debug!("POST {url} (signer: {})", request.signer_name);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        read_bytes(check_status(response).await?).await
    }

    async fn catalog(&self) -> Result<DocumentCatalog, BackendError> {
        let url = self.catalog_url();
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await.map_err(transport)?;
        check_status(response)
            .await?
            .json::<DocumentCatalog>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_document_routes() {
        let backend = HttpBackend::with_client(Client::new(), "http://localhost:2124/api/");
        let key = DocumentKey::new("receiving", "po-receipt");
        assert_eq!(backend.api_base(), "http://localhost:2124/api");
        assert_eq!(
            backend.document_url(&key),
            "http://localhost:2124/api/documents/receiving/po-receipt"
        );
        assert_eq!(
            backend.sign_url(&key),
            "http://localhost:2124/api/documents/receiving/po-receipt/sign"
        );
        assert_eq!(
            backend.catalog_url(),
            "http://localhost:2124/api/documents/available"
        );
    }

    #[test]
    fn sign_body_uses_snake_case_field_names() {
        let body = serde_json::to_value(SignRequest {
            signature: "data:image/png;base64,AAAA".to_string(),
            signer_name: "Alice".to_string(),
        })
        .expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({ "signature": "data:image/png;base64,AAAA", "signer_name": "Alice" })
        );
    }
}
