pub mod approval_handlers;

use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};

use crate::errors::AppError;

/// Largest accepted JSON body; signature images arrive as data URLs.
pub const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// JSON extractor settings: body limit, and malformed bodies reported as
/// 400 with a JSON error instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body: {err}");
    AppError::Validation(format!("Invalid JSON body: {err}")).into()
}

/// All routes served by the binary. Expects `web::Data<ApprovalTracker>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/ws/approvals", web::get().to(approval_handlers::ws::ws_connect))
        .service(web::scope("/api").configure(approval_handlers::configure));
}
