//! `/ws/approvals` against a real listening server: frames pushed on signing,
//! and cleanup when a client disappears.

use actix_web::{App, http::StatusCode, web};
use awc::ws::Frame;
use futures_util::StreamExt;
use serde_json::{Value, json};
use std::time::Duration;

use wms_approvals::handlers;
use wms_approvals::models::document::{DocumentStore, seed};

mod common;
use common::{SIGNATURE_A, setup_tracker};

const WAIT: Duration = Duration::from_secs(5);

fn start_server() -> (actix_test::TestServer, DocumentStore) {
    let (tracker, _) = setup_tracker(seed::demo_documents());
    let store = tracker.store().clone();
    let data = web::Data::new(tracker);
    let srv = actix_test::start(move || {
        App::new()
            .app_data(data.clone())
            .configure(handlers::configure)
    });
    (srv, store)
}

/// Polls until the store has `expected` subscribers or `WAIT` runs out.
async fn wait_for_subscribers(store: &DocumentStore, expected: usize) -> bool {
    let deadline = tokio::time::Instant::now() + WAIT;
    while tokio::time::Instant::now() < deadline {
        if store.subscriber_count() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    store.subscriber_count() == expected
}

#[actix_web::test]
async fn test_signing_pushes_document_updated_frame() {
    let (mut srv, _store) = start_server();
    let mut ws = srv.ws_at("/ws/approvals").await.expect("websocket handshake");

    let resp = srv
        .post("/api/approvals/DOC-004/sign")
        .send_json(&json!({ "signature": SIGNATURE_A, "signer_name": "Dispatcher" }))
        .await
        .expect("sign request");
    assert_eq!(resp.status(), StatusCode::OK);

    let frame = tokio::time::timeout(WAIT, ws.next())
        .await
        .expect("frame before timeout")
        .expect("socket still open")
        .expect("valid frame");
    let text = match frame {
        Frame::Text(text) => text,
        other => panic!("expected a text frame, got {other:?}"),
    };
    let event: Value = serde_json::from_slice(&text).expect("json frame");
    assert_eq!(event["type"], "document_updated");
    assert_eq!(event["document_id"], "DOC-004");
    assert_eq!(event["version"], 2);
    assert_eq!(event["status"], "signed");
    assert_eq!(event["signature_count"], 2);
}

#[actix_web::test]
async fn test_failed_sign_pushes_nothing() {
    let (mut srv, _store) = start_server();
    let mut ws = srv.ws_at("/ws/approvals").await.expect("websocket handshake");

    let resp = srv
        .post("/api/approvals/DOC-004/sign")
        .send_json(&json!({ "signature": SIGNATURE_A, "signer_name": "  " }))
        .await
        .expect("sign request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let next = tokio::time::timeout(Duration::from_millis(300), ws.next()).await;
    assert!(next.is_err(), "no frame expected, got {next:?}");
}

#[actix_web::test]
async fn test_dropped_client_releases_its_subscription() {
    let (mut srv, store) = start_server();
    assert_eq!(store.subscriber_count(), 0);

    let ws = srv.ws_at("/ws/approvals").await.expect("websocket handshake");
    assert!(wait_for_subscribers(&store, 1).await);

    // No close frame: the connection just goes away.
    drop(ws);
    assert!(
        wait_for_subscribers(&store, 0).await,
        "session task kept its subscription after the client vanished"
    );
}
