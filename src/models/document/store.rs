use serde::Serialize;
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use super::types::{Document, DocumentStatus};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    Duplicate(String),
    /// A write for `id` carried a document with a different id.
    IdMismatch { id: String, found: String },
    VersionConflict { id: String, expected: u64, actual: u64 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Document {id} not found"),
            StoreError::Duplicate(id) => write!(f, "Document {id} already tracked"),
            StoreError::IdMismatch { id, found } => {
                write!(f, "Cannot store document {found} in place of {id}")
            }
            StoreError::VersionConflict { id, expected, actual } => write!(
                f,
                "Document {id} changed concurrently (expected version {expected}, found {actual})"
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// A document snapshot together with the version it was stored under.
#[derive(Debug, Clone)]
pub struct Versioned {
    pub document: Arc<Document>,
    pub version: u64,
}

/// Pushed to subscribers after every successful insert or replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEvent {
    pub document_id: String,
    pub version: u64,
    pub status: DocumentStatus,
    pub signature_count: usize,
}

impl StoreEvent {
    fn from_entry(entry: &Versioned) -> Self {
        Self {
            document_id: entry.document.id.clone(),
            version: entry.version,
            status: entry.document.status(),
            signature_count: entry.document.signatures().len(),
        }
    }
}

/// In-memory working set of documents for the session.
///
/// The list is held as an immutable snapshot; every write swaps in a new list,
/// so a reader holding an older snapshot keeps a consistent view. Each document
/// carries a version counter and replacements are conditional on it.
#[derive(Clone)]
pub struct DocumentStore {
    entries: Arc<RwLock<Arc<Vec<Versioned>>>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: Arc::new(RwLock::new(Arc::new(Vec::new()))),
            events,
        }
    }

    pub fn with_documents(documents: Vec<Document>) -> Result<Self, StoreError> {
        let store = Self::new();
        for doc in documents {
            store.insert(doc)?;
        }
        Ok(store)
    }

    fn snapshot(&self) -> Arc<Vec<Versioned>> {
        let guard = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// All documents in insertion order.
    pub fn list(&self) -> Vec<Arc<Document>> {
        self.snapshot()
            .iter()
            .map(|entry| Arc::clone(&entry.document))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Versioned> {
        self.snapshot().iter().find(|e| e.document.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Start tracking a document at version 1.
    pub fn insert(&self, document: Document) -> Result<(), StoreError> {
        let event = {
            let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
            if guard.iter().any(|e| e.document.id == document.id) {
                return Err(StoreError::Duplicate(document.id));
            }
            let entry = Versioned {
                document: Arc::new(document),
                version: 1,
            };
            let event = StoreEvent::from_entry(&entry);
            let mut next: Vec<Versioned> = guard.as_ref().clone();
            next.push(entry);
            *guard = Arc::new(next);
            event
        };
        self.publish(event);
        Ok(())
    }

    /// Replace document `id` with `document`, provided nobody else replaced it
    /// since `expected_version` was read. Returns the stored entry.
    pub fn replace(
        &self,
        id: &str,
        document: Document,
        expected_version: u64,
    ) -> Result<Versioned, StoreError> {
        let stored = {
            let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
            let idx = guard
                .iter()
                .position(|e| e.document.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            check_id(id, &document)?;
            let actual = guard[idx].version;
            if actual != expected_version {
                return Err(StoreError::VersionConflict {
                    id: id.to_string(),
                    expected: expected_version,
                    actual,
                });
            }
            let entry = Versioned {
                document: Arc::new(document),
                version: actual + 1,
            };
            let mut next: Vec<Versioned> = guard.as_ref().clone();
            next[idx] = entry.clone();
            *guard = Arc::new(next);
            entry
        };
        self.publish(StoreEvent::from_entry(&stored));
        Ok(stored)
    }

    /// Apply `f` to the current document and store the result, all under one
    /// write lock. Cannot lose a race, unlike `replace`.
    pub fn update<F>(&self, id: &str, f: F) -> Result<Versioned, StoreError>
    where
        F: FnOnce(&Document) -> Document,
    {
        let stored = {
            let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
            let idx = guard
                .iter()
                .position(|e| e.document.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let document = f(&guard[idx].document);
            check_id(id, &document)?;
            let entry = Versioned {
                document: Arc::new(document),
                version: guard[idx].version + 1,
            };
            let mut next: Vec<Versioned> = guard.as_ref().clone();
            next[idx] = entry.clone();
            *guard = Arc::new(next);
            entry
        };
        self.publish(StoreEvent::from_entry(&stored));
        Ok(stored)
    }

    /// Number of live `subscribe()` receivers.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Receive a `StoreEvent` for every later change. Slow receivers may see
    /// `RecvError::Lagged` and should re-read `list()`.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: StoreEvent) {
        // No receivers is the normal case outside of open WebSocket sessions.
        let _ = self.events.send(event);
    }
}

/// Ids are stable: a write for `id` must carry a document with that id.
fn check_id(id: &str, document: &Document) -> Result<(), StoreError> {
    if document.id == id {
        Ok(())
    } else {
        Err(StoreError::IdMismatch {
            id: id.to_string(),
            found: document.id.clone(),
        })
    }
}
