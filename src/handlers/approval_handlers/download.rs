use actix_web::{HttpResponse, web};

use super::attachment;
use crate::errors::AppError;
use crate::tracker::ApprovalTracker;

/// GET /api/approvals/{id}/download
/// Returns the unsigned rendering of the document. Never changes its state.
pub async fn download(
    tracker: web::Data<ApprovalTracker>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document = tracker.get(&path.into_inner())?;
    let artifact = tracker.download(&document).await?;
    Ok(attachment(artifact))
}
