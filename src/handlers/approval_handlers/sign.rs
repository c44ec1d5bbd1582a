use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::attachment;
use crate::errors::AppError;
use crate::tracker::ApprovalTracker;

#[derive(Debug, Clone, Deserialize)]
pub struct SignForm {
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub signer_name: String,
}

impl SignForm {
    /// Returns the trimmed signer name, or the list of problems.
    pub fn validate(&self) -> Result<&str, Vec<String>> {
        let mut errors = vec![];
        if self.signature.trim().is_empty() {
            errors.push("Signature image is required".to_string());
        }
        let signer_name = self.signer_name.trim();
        if signer_name.is_empty() {
            errors.push("Signer name is required".to_string());
        }
        if errors.is_empty() {
            Ok(signer_name)
        } else {
            Err(errors)
        }
    }
}

/// POST /api/approvals/{id}/sign
/// Generates and signs the document, records the signature and returns the
/// signed PDF as an attachment.
pub async fn sign(
    tracker: web::Data<ApprovalTracker>,
    path: web::Path<String>,
    form: web::Json<SignForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let signer_name = form.validate().map_err(|e| AppError::Validation(e.join("; ")))?;

    let document = tracker.get(&id)?;
    if !document.is_pending() {
        return Err(AppError::Conflict(format!(
            "Document {id} is already {}",
            document.status()
        )));
    }

    let outcome = tracker
        .submit_signature(&document, &form.signature, signer_name)
        .await?;

    let mut response = attachment(outcome.artifact);
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-document-status"),
        HeaderValue::from_static(outcome.document.status().as_str()),
    );
    headers.insert(
        HeaderName::from_static("x-signature-count"),
        HeaderValue::from(outcome.document.signatures().len()),
    );
    Ok(response)
}
