use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::backend::BackendError;
use crate::models::document::{DocumentKey, StoreError};

/// Failure of a tracker operation. None of these are fatal; the caller shows
/// the error and may retry the whole operation.
#[derive(Debug)]
pub enum ApprovalError {
    /// The backend could not render the base document (step 1 of signing).
    GenerationFailed { key: DocumentKey, source: BackendError },
    /// The backend rejected or failed to apply the signature (step 2).
    SignSubmissionFailed { key: DocumentKey, source: BackendError },
    DownloadFailed { key: DocumentKey, source: BackendError },
    CatalogUnavailable(BackendError),
    DocumentNotFound(String),
    Store(StoreError),
}

impl ApprovalError {
    /// Error text returned by the backend, when it sent any.
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            ApprovalError::GenerationFailed { source, .. }
            | ApprovalError::SignSubmissionFailed { source, .. }
            | ApprovalError::DownloadFailed { source, .. }
            | ApprovalError::CatalogUnavailable(source) => source.detail(),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalError::GenerationFailed { key, source } => {
                write!(f, "Generation failed for {key}: {source}")
            }
            ApprovalError::SignSubmissionFailed { key, source } => {
                write!(f, "Sign submission failed for {key}: {source}")
            }
            ApprovalError::DownloadFailed { key, source } => {
                write!(f, "Download failed for {key}: {source}")
            }
            ApprovalError::CatalogUnavailable(e) => write!(f, "Document catalog unavailable: {e}"),
            ApprovalError::DocumentNotFound(id) => write!(f, "Document {id} not found"),
            ApprovalError::Store(e) => write!(f, "Store error: {e}"),
        }
    }
}

impl std::error::Error for ApprovalError {}

impl From<StoreError> for ApprovalError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApprovalError::DocumentNotFound(id),
            other => ApprovalError::Store(other),
        }
    }
}

/// Handler-level error, rendered as a JSON body.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    Validation(String),
    Conflict(String),
    Approval(ApprovalError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not found"),
            AppError::Validation(msg) => write!(f, "Validation error: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Approval(e) => write!(f, "{e}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::Approval(ApprovalError::DocumentNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) | AppError::Approval(ApprovalError::Store(_)) => {
                StatusCode::CONFLICT
            }
            AppError::Approval(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            AppError::NotFound => serde_json::json!({ "error": "Not found" }),
            AppError::Validation(msg) | AppError::Conflict(msg) => {
                serde_json::json!({ "error": msg })
            }
            AppError::Approval(e) => {
                if status.is_server_error() {
                    log::warn!("{e}");
                }
                serde_json::json!({
                    "error": approval_error_code(e),
                    "detail": e.backend_detail(),
                    "message": e.to_string(),
                })
            }
        };
        HttpResponse::build(status).json(body)
    }
}

fn approval_error_code(e: &ApprovalError) -> &'static str {
    match e {
        ApprovalError::GenerationFailed { .. } => "generation_failed",
        ApprovalError::SignSubmissionFailed { .. } => "sign_submission_failed",
        ApprovalError::DownloadFailed { .. } => "download_failed",
        ApprovalError::CatalogUnavailable(_) => "catalog_unavailable",
        ApprovalError::DocumentNotFound(_) => "document_not_found",
        ApprovalError::Store(_) => "store_conflict",
    }
}

impl From<ApprovalError> for AppError {
    fn from(e: ApprovalError) -> Self {
        AppError::Approval(e)
    }
}
