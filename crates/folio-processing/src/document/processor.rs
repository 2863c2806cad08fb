//! Document processor - PDF signature check and info-dictionary scan

use std::sync::LazyLock;

use folio_core::DocumentMetadata;
use regex::bytes::Regex;

static PAGE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Count\s+(\d+)").expect("page count pattern is valid"));

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Title\s*\(([^)]*)\)").expect("title pattern is valid"));

static AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Author\s*\(([^)]*)\)").expect("author pattern is valid"));

pub struct DocumentProcessor;

impl DocumentProcessor {
    /// True when the bytes carry the PDF file signature.
    pub fn is_pdf(data: &[u8]) -> bool {
        data.starts_with(b"%PDF")
    }

    /// Scan the raw document for page count, title and author.
    ///
    /// This is a lightweight scan of uncompressed objects, not a PDF parser:
    /// documents with compressed object streams yield `None` fields.
    pub fn extract_metadata(data: &[u8]) -> DocumentMetadata {
        if !Self::is_pdf(data) {
            return DocumentMetadata::default();
        }

        // Intermediate page-tree nodes carry partial counts; the root holds the total
        let page_count = PAGE_COUNT
            .captures_iter(data)
            .filter_map(|caps| std::str::from_utf8(&caps[1]).ok()?.parse::<u32>().ok())
            .max();

        let metadata = DocumentMetadata {
            page_count,
            title: Self::literal(&TITLE, data),
            author: Self::literal(&AUTHOR, data),
        };

        tracing::debug!(
            page_count = ?metadata.page_count,
            has_title = metadata.title.is_some(),
            "Extracted document metadata"
        );

        metadata
    }

    fn literal(pattern: &Regex, data: &[u8]) -> Option<String> {
        let caps = pattern.captures(data)?;
        let text = String::from_utf8_lossy(&caps[1]).trim().to_string();
        Some(text).filter(|t| !t.is_empty())
    }
}
