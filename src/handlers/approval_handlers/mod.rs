pub mod download;
pub mod list;
pub mod sign;
pub mod ws;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::tracker::Artifact;

pub use download::download;
pub use list::{catalog, detail, list};
pub use sign::sign;

/// Rejects POST requests without `Content-Type: application/json`.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if req.method() == actix_web::http::Method::POST {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Send an artifact as a file download.
pub(crate) fn attachment(artifact: Artifact) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(artifact.content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", artifact.filename),
        ))
        .body(artifact.bytes)
}

/// Configure `/api/approvals` routes. `/catalog` is registered before `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/approvals")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(list))
            .route("/catalog", web::get().to(catalog))
            .route("/{id}", web::get().to(detail))
            .route("/{id}/sign", web::post().to(sign))
            .route("/{id}/download", web::get().to(download)),
    );
}
