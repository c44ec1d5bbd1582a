use bytes::Bytes;
use chrono::NaiveDate;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered file handed back to the caller for saving. The tracker never
/// writes it anywhere itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl Artifact {
    pub fn pdf(filename: String, bytes: Bytes) -> Self {
        Self {
            filename,
            content_type: PDF_CONTENT_TYPE,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `{type}_signed_{YYYY-MM-DD}.pdf` for signed copies, `{type}_{YYYY-MM-DD}.pdf` otherwise.
pub fn artifact_filename(document_type: &str, signed: bool, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    if signed {
        format!("{document_type}_signed_{date}.pdf")
    } else {
        format!("{document_type}_{date}.pdf")
    }
}
