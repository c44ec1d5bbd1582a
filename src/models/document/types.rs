use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Approval state of a document. Derived from the signature count, never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Signed,
    /// Part of the model, but no transition leads here.
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Signed => "signed",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List filter offered by the approvals view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Signed,
}

impl StatusFilter {
    pub fn matches(&self, status: DocumentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == DocumentStatus::Pending,
            StatusFilter::Signed => status == DocumentStatus::Signed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "signed" => Ok(StatusFilter::Signed),
            other => Err(format!("Unknown filter '{other}' (expected all, pending or signed)")),
        }
    }
}

/// Which template the backend renders: `/documents/{category}/{document_type}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    pub category: String,
    pub document_type: String,
}

impl DocumentKey {
    pub fn new(category: impl Into<String>, document_type: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            document_type: document_type.into(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.document_type)
    }
}

/// One recorded signature. The image payload goes to the backend and is not kept locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub signer_name: String,
    pub signed_at: DateTime<Utc>,
}

impl Signature {
    pub fn new(signer_name: impl Into<String>, signed_at: DateTime<Utc>) -> Self {
        Self {
            signer_name: signer_name.into(),
            signed_at,
        }
    }
}

/// A piece of paperwork that needs one signature per required signer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub key: DocumentKey,
    pub generated_at: NaiveDateTime,
    pub required_signers: Vec<String>,
    signatures: Vec<Signature>,
    status: DocumentStatus,
}

impl Document {
    /// Build a document; status is derived from `signatures`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        key: DocumentKey,
        generated_at: NaiveDateTime,
        required_signers: Vec<String>,
        signatures: Vec<Signature>,
    ) -> Self {
        let status = derive_status(signatures.len(), required_signers.len());
        Self {
            id: id.into(),
            name: name.into(),
            key,
            generated_at,
            required_signers,
            signatures,
            status,
        }
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == DocumentStatus::Pending
    }

    /// Returns a new document with `signature` appended and status recomputed.
    /// `self` is left untouched so earlier snapshots stay valid.
    pub fn with_signature(&self, signature: Signature) -> Self {
        let mut next = self.clone();
        next.signatures.push(signature);
        next.status = derive_status(next.signatures.len(), next.required_signers.len());
        next
    }

    /// Per-role view used by the detail page: which required roles have a
    /// signature recorded under that exact name.
    pub fn signer_progress(&self) -> Vec<SignerProgress> {
        self.required_signers
            .iter()
            .map(|role| SignerProgress {
                role: role.clone(),
                signed_at: self
                    .signatures
                    .iter()
                    .find(|s| s.signer_name == *role)
                    .map(|s| s.signed_at),
            })
            .collect()
    }
}

/// Count-based completion: the document is signed once there are at least as
/// many signatures as required signers.
pub fn derive_status(signature_count: usize, required_count: usize) -> DocumentStatus {
    if signature_count >= required_count {
        DocumentStatus::Signed
    } else {
        DocumentStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignerProgress {
    pub role: String,
    pub signed_at: Option<DateTime<Utc>>,
}

/// Counters shown above the approvals list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalStats {
    pub total: usize,
    pub pending: usize,
    pub signed: usize,
}

impl ApprovalStats {
    pub fn from_documents<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        documents.into_iter().fold(Self::default(), |mut acc, doc| {
            acc.total += 1;
            match doc.status() {
                DocumentStatus::Pending => acc.pending += 1,
                DocumentStatus::Signed => acc.signed += 1,
                DocumentStatus::Rejected => {}
            }
            acc
        })
    }
}
