use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::types::{Document, DocumentKey, Signature};

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn signed(name: &str, day: u32, hour: u32, minute: u32) -> Signature {
    Signature::new(name, Utc.from_utc_datetime(&at(day, hour, minute)))
}

fn roles(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Sample documents loaded when `APPROVALS_SEED_DEMO` is on.
pub fn demo_documents() -> Vec<Document> {
    vec![
        Document::new(
            "DOC-001",
            "PO Receipt - November 2025",
            DocumentKey::new("receiving", "po-receipt"),
            at(20, 10, 30),
            roles(&["Warehouse Manager", "Operations Director"]),
            vec![],
        ),
        Document::new(
            "DOC-002",
            "Inventory Report - Q4 2025",
            DocumentKey::new("inventory", "inventory-report"),
            at(20, 9, 15),
            roles(&["Inventory Manager", "Finance Director"]),
            vec![],
        ),
        Document::new(
            "DOC-003",
            "Pick List - Order #12345",
            DocumentKey::new("fulfillment", "pick-list"),
            at(20, 8, 0),
            roles(&["Picker", "Supervisor"]),
            vec![signed("John Smith", 20, 8, 30), signed("Jane Doe", 20, 9, 0)],
        ),
        Document::new(
            "DOC-004",
            "Shipping Label - Delivery #789",
            DocumentKey::new("fulfillment", "shipping-label"),
            at(19, 16, 45),
            roles(&["Driver", "Dispatcher"]),
            vec![signed("Mike Johnson", 19, 17, 0)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::types::DocumentStatus;

    #[test]
    fn demo_statuses() {
        let docs = demo_documents();
        let statuses: Vec<DocumentStatus> = docs.iter().map(|d| d.status()).collect();
        assert_eq!(
            statuses,
            vec![
                DocumentStatus::Pending,
                DocumentStatus::Pending,
                DocumentStatus::Signed,
                DocumentStatus::Pending,
            ]
        );
    }
}
