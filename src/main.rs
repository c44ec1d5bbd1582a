use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;

use wms_approvals::backend::HttpBackend;
use wms_approvals::config::AppConfig;
use wms_approvals::handlers;
use wms_approvals::models::document::{DocumentStore, seed};
use wms_approvals::tracker::ApprovalTracker;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // .env is optional; real environment variables win
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env: {e}");
        }
    }
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("WMS backend: {}", config.api_url);

    let backend = HttpBackend::new(config.api_url.clone(), config.request_timeout)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let documents = if config.seed_demo {
        seed::demo_documents()
    } else {
        Vec::new()
    };
    let store = DocumentStore::with_documents(documents)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!("Tracking {} documents", store.len());

    let tracker = web::Data::new(ApprovalTracker::new(store, Arc::new(backend)));

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(tracker.clone())
            .configure(handlers::configure)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
