use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One document template the backend can render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub document_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub endpoint: String,
}

/// Available document types grouped by category, as returned by
/// `GET /documents/available`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentCatalog {
    pub categories: BTreeMap<String, Vec<CatalogEntry>>,
}

impl DocumentCatalog {
    pub fn entry_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_listing() {
        let json = r#"{
            "receiving": [
                {"type": "po_receipt", "name": "Purchase Order Receipt",
                 "description": "Document confirming receipt of a purchase order",
                 "endpoint": "/api/documents/receiving/po-receipt"}
            ],
            "fulfillment": [
                {"type": "pick_list", "name": "Pick List"},
                {"type": "packing_slip", "name": "Packing Slip"}
            ]
        }"#;
        let catalog: DocumentCatalog = serde_json::from_str(json).expect("parse");
        assert_eq!(catalog.entry_count(), 3);
        assert_eq!(catalog.categories["receiving"][0].document_type, "po_receipt");
        assert!(catalog.categories["fulfillment"][1].endpoint.is_empty());
    }
}
