use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use tokio::sync::broadcast::error::RecvError;

use crate::models::document::StoreEvent;
use crate::tracker::ApprovalTracker;

/// Frame sent to WebSocket clients for each store change.
pub fn event_message(event: &StoreEvent) -> String {
    serde_json::json!({
        "type": "document_updated",
        "document_id": event.document_id,
        "version": event.version,
        "status": event.status,
        "signature_count": event.signature_count,
    })
    .to_string()
}

/// GET /ws/approvals - Pushes one JSON frame per document change.
pub async fn ws_connect(
    req: HttpRequest,
    body: web::Payload,
    tracker: web::Data<ApprovalTracker>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, body)?;
    let mut events = tracker.store().subscribe();
    log::debug!(
        "Approvals WebSocket opened ({} subscribers)",
        tracker.store().subscriber_count()
    );

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                received = events.recv() => {
                    let msg = match received {
                        Ok(event) => event_message(&event),
                        Err(RecvError::Lagged(skipped)) => {
                            // Client missed updates; tell it to reload the list.
                            serde_json::json!({ "type": "resync", "skipped": skipped }).to_string()
                        }
                        Err(RecvError::Closed) => break,
                    };
                    if ws_session.text(msg).await.is_err() {
                        break;
                    }
                }
                incoming = msg_stream.recv() => {
                    match incoming {
                        Some(Ok(Message::Ping(bytes))) => {
                            if ws_session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) => break,
                        Some(Ok(Message::Text(_))) => {
                            // Signing goes through HTTP POST, not WS
                        }
                        Some(Ok(_)) => {}
                        // Client went away without a close frame
                        None | Some(Err(_)) => break,
                    }
                }
            }
        }
        let _ = ws_session.close(None).await;
        log::debug!("Approvals WebSocket closed");
    });

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentStatus;

    #[test]
    fn event_frame_shape() {
        let msg = event_message(&StoreEvent {
            document_id: "DOC-001".to_string(),
            version: 3,
            status: DocumentStatus::Signed,
            signature_count: 2,
        });
        let value: serde_json::Value = serde_json::from_str(&msg).expect("json");
        assert_eq!(value["type"], "document_updated");
        assert_eq!(value["status"], "signed");
        assert_eq!(value["signature_count"], 2);
    }
}
