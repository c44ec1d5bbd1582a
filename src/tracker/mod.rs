//! Approval tracker: the session's document list plus the generate-then-sign
//! round trip against the WMS backend.

pub mod artifact;

use chrono::Utc;
use std::sync::Arc;

use crate::backend::{DocumentBackend, SignRequest};
use crate::errors::ApprovalError;
use crate::models::catalog::DocumentCatalog;
use crate::models::document::{
    ApprovalStats, Document, DocumentStore, Signature, StatusFilter,
};

pub use artifact::{Artifact, artifact_filename};

/// Result of a successful `submit_signature`.
#[derive(Debug, Clone)]
pub struct SignOutcome {
    pub document: Arc<Document>,
    pub version: u64,
    pub artifact: Artifact,
}

#[derive(Clone)]
pub struct ApprovalTracker {
    store: DocumentStore,
    backend: Arc<dyn DocumentBackend>,
}

impl ApprovalTracker {
    pub fn new(store: DocumentStore, backend: Arc<dyn DocumentBackend>) -> Self {
        Self { store, backend }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Documents matching `filter`, in store order.
    pub fn list_by_filter(&self, filter: StatusFilter) -> Vec<Arc<Document>> {
        self.store
            .list()
            .into_iter()
            .filter(|doc| filter.matches(doc.status()))
            .collect()
    }

    pub fn stats(&self) -> ApprovalStats {
        let docs = self.store.list();
        ApprovalStats::from_documents(docs.iter().map(|d| d.as_ref()))
    }

    pub fn get(&self, id: &str) -> Result<Arc<Document>, ApprovalError> {
        self.store
            .get(id)
            .map(|entry| entry.document)
            .ok_or_else(|| ApprovalError::DocumentNotFound(id.to_string()))
    }

    /// Generate the document, submit the signature, then record it locally.
    ///
    /// Inputs are not validated here: callers must pass a non-empty image and a
    /// non-blank signer name. The local list changes only after the backend
    /// accepted the signature; on any error the document is left as it was.
    /// Nothing stops a caller from signing a document that is already signed.
    pub async fn submit_signature(
        &self,
        document: &Document,
        signature_image: &str,
        signer_name: &str,
    ) -> Result<SignOutcome, ApprovalError> {
        let key = &document.key;
        if self.store.get(&document.id).is_none() {
            return Err(ApprovalError::DocumentNotFound(document.id.clone()));
        }

        self.backend.generate(key).await.map_err(|source| {
            log::warn!("Generating {} for {} failed: {source}", key, document.id);
            ApprovalError::GenerationFailed {
                key: key.clone(),
                source,
            }
        })?;

        let request = SignRequest {
            signature: signature_image.to_string(),
            signer_name: signer_name.to_string(),
        };
        let signed_pdf = self.backend.sign(key, &request).await.map_err(|source| {
            log::warn!("Signing {} for {} failed: {source}", key, document.id);
            ApprovalError::SignSubmissionFailed {
                key: key.clone(),
                source,
            }
        })?;

        let signature = Signature::new(signer_name, Utc::now());
        let (updated, version) = self.append_signature(&document.id, signature.clone())?;
        log::info!(
            "{} signed by {} ({}/{} signatures, {})",
            updated.id,
            signer_name,
            updated.signatures().len(),
            updated.required_signers.len(),
            updated.status()
        );

        let filename = artifact_filename(
            &key.document_type,
            true,
            signature.signed_at.date_naive(),
        );
        Ok(SignOutcome {
            document: updated,
            version,
            artifact: Artifact::pdf(filename, signed_pdf),
        })
    }

    /// Append to whatever version is current when the write lock is taken.
    /// The backend already accepted the signature, so this must not lose races.
    fn append_signature(
        &self,
        id: &str,
        signature: Signature,
    ) -> Result<(Arc<Document>, u64), ApprovalError> {
        let stored = self
            .store
            .update(id, |current| current.with_signature(signature))?;
        Ok((stored.document, stored.version))
    }

    /// Fetch the rendered, unsigned document. Never touches the store.
    pub async fn download(&self, document: &Document) -> Result<Artifact, ApprovalError> {
        let key = &document.key;
        let bytes = self.backend.generate(key).await.map_err(|source| {
            log::warn!("Downloading {} for {} failed: {source}", key, document.id);
            ApprovalError::DownloadFailed {
                key: key.clone(),
                source,
            }
        })?;
        let filename = artifact_filename(&key.document_type, false, Utc::now().date_naive());
        log::info!("Downloaded {} ({} bytes)", filename, bytes.len());
        Ok(Artifact::pdf(filename, bytes))
    }

    pub async fn catalog(&self) -> Result<DocumentCatalog, ApprovalError> {
        self.backend
            .catalog()
            .await
            .map_err(ApprovalError::CatalogUnavailable)
    }
}
