//! Shared test infrastructure: a scripted backend and document fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use wms_approvals::backend::{BackendError, DocumentBackend, SignRequest};
use wms_approvals::models::catalog::{CatalogEntry, DocumentCatalog};
use wms_approvals::models::document::{Document, DocumentKey, DocumentStore};
use wms_approvals::tracker::ApprovalTracker;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const UNSIGNED_PDF: &[u8] = b"%PDF-1.4 unsigned";
pub const SIGNED_PDF: &[u8] = b"%PDF-1.4 signed";
pub const SIGNATURE_A: &str = "data:image/png;base64,iVBORw0KGgoA";
pub const SIGNATURE_B: &str = "data:image/png;base64,iVBORw0KGgoB";

// ============================================================================
// FAKE BACKEND
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Generate(DocumentKey),
    Sign(DocumentKey, SignRequest),
    Catalog,
}

/// Backend double. Each call pops the next scripted failure for its kind,
/// and succeeds when none is queued.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    generate_failures: Mutex<VecDeque<BackendError>>,
    sign_failures: Mutex<VecDeque<BackendError>>,
    catalog_failures: Mutex<VecDeque<BackendError>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_generate(&self, error: BackendError) {
        self.generate_failures.lock().unwrap().push_back(error);
    }

    pub fn fail_sign(&self, error: BackendError) {
        self.sign_failures.lock().unwrap().push_back(error);
    }

    pub fn fail_catalog(&self, error: BackendError) {
        self.catalog_failures.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sign_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Sign(..)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_failure(queue: &Mutex<VecDeque<BackendError>>) -> Option<BackendError> {
        queue.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl DocumentBackend for FakeBackend {
    async fn generate(&self, key: &DocumentKey) -> Result<Bytes, BackendError> {
        self.record(Call::Generate(key.clone()));
        // Let other tasks run between the two remote steps.
        tokio::task::yield_now().await;
        match Self::next_failure(&self.generate_failures) {
            Some(e) => Err(e),
            None => Ok(Bytes::from_static(UNSIGNED_PDF)),
        }
    }

    async fn sign(&self, key: &DocumentKey, request: &SignRequest) -> Result<Bytes, BackendError> {
        self.record(Call::Sign(key.clone(), request.clone()));
        tokio::task::yield_now().await;
        match Self::next_failure(&self.sign_failures) {
            Some(e) => Err(e),
            None => Ok(Bytes::from_static(SIGNED_PDF)),
        }
    }

    async fn catalog(&self) -> Result<DocumentCatalog, BackendError> {
        self.record(Call::Catalog);
        if let Some(e) = Self::next_failure(&self.catalog_failures) {
            return Err(e);
        }
        let mut catalog = DocumentCatalog::default();
        catalog.categories.insert(
            "receiving".to_string(),
            vec![CatalogEntry {
                document_type: "po_receipt".to_string(),
                name: "Purchase Order Receipt".to_string(),
                description: "Document confirming receipt of a purchase order".to_string(),
                endpoint: "/api/documents/receiving/po-receipt".to_string(),
            }],
        );
        Ok(catalog)
    }
}

pub fn server_error() -> BackendError {
    BackendError::Status {
        status: 500,
        body: "Internal Server Error".to_string(),
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Two-signer purchase-order receipt with no signatures yet.
pub fn po_receipt(id: &str) -> Document {
    let generated_at = NaiveDate::from_ymd_opt(2025, 11, 20)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .expect("valid date");
    Document::new(
        id,
        "PO Receipt - November 2025",
        DocumentKey::new("receiving", "po-receipt"),
        generated_at,
        vec!["Warehouse Manager".to_string(), "Operations Director".to_string()],
        vec![],
    )
}

/// Tracker over `documents` and a fresh fake backend.
pub fn setup_tracker(documents: Vec<Document>) -> (ApprovalTracker, Arc<FakeBackend>) {
    let backend = FakeBackend::new();
    let store = DocumentStore::with_documents(documents).expect("seed store");
    let tracker = ApprovalTracker::new(store, backend.clone());
    (tracker, backend)
}
