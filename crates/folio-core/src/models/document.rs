use serde::{Deserialize, Serialize};

/// Document metadata scanned from the PDF body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub page_count: Option<u32>,
    pub title: Option<String>,
    pub author: Option<String>,
}
