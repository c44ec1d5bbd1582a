use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::document::{ApprovalStats, Document, SignerProgress, StatusFilter};
use crate::tracker::ApprovalTracker;

#[derive(Serialize)]
pub struct ApprovalListResponse<'a> {
    pub filter: StatusFilter,
    pub items: Vec<&'a Document>,
    pub stats: ApprovalStats,
}

#[derive(Serialize)]
pub struct ApprovalDetailResponse<'a> {
    pub document: &'a Document,
    pub signature_count: usize,
    pub progress: Vec<SignerProgress>,
    /// The sign action is only offered while the document is pending.
    pub can_sign: bool,
}

/// GET /api/approvals - Documents with optional `filter` (all, pending, signed)
/// plus the counters for the tabs.
pub async fn list(
    tracker: web::Data<ApprovalTracker>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let filter = match query.get("filter") {
        Some(raw) => raw.parse::<StatusFilter>().map_err(AppError::Validation)?,
        None => StatusFilter::All,
    };

    let documents = tracker.list_by_filter(filter);
    Ok(HttpResponse::Ok().json(ApprovalListResponse {
        filter,
        items: documents.iter().map(|d| d.as_ref()).collect(),
        stats: tracker.stats(),
    }))
}

/// GET /api/approvals/{id}
pub async fn detail(
    tracker: web::Data<ApprovalTracker>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document = tracker.get(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(ApprovalDetailResponse {
        document: &document,
        signature_count: document.signatures().len(),
        progress: document.signer_progress(),
        can_sign: document.is_pending(),
    }))
}

/// GET /api/approvals/catalog - Document types the backend can render.
pub async fn catalog(tracker: web::Data<ApprovalTracker>) -> Result<HttpResponse, AppError> {
    let catalog = tracker.catalog().await?;
    Ok(HttpResponse::Ok().json(catalog))
}
