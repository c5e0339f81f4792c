//! Domain types shared by the retrieval engines and the answer layer.

use serde::{Deserialize, Serialize};

/// Number of leading characters of chunk content that participate in the
/// dedupe fingerprint.
pub const FINGERPRINT_PREFIX_CHARS: usize = 50;

/// A bounded span of source-document text, the atomic unit of retrieval.
///
/// - `content`: normalized text payload
/// - `source_document`: name of the originating file
/// - `page_number`: zero-based page, 0 when the source is not paginated
///
/// Chunks are created during ingestion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub source_document: String,
    pub page_number: usize,
}

impl Chunk {
    /// Derive the lossy identity key used to collapse near-duplicate hits
    /// across retrieval signals.
    ///
    /// Two chunks with the same content prefix, source document and page
    /// count as the same hit even when their full contents differ, which
    /// happens when overlapping chunk windows land on the same passage.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            content_prefix: self.content.chars().take(FINGERPRINT_PREFIX_CHARS).collect(),
            source_document: self.source_document.clone(),
            page_number: self.page_number,
        }
    }
}

/// Cheap, intentionally lossy equality key: content prefix + source + page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    content_prefix: String,
    source_document: String,
    page_number: usize,
}

/// Telemetry for a single hybrid retrieval call.
///
/// Invariant: `final_results <= vector_results + keyword_results`, and
/// `final_results` never exceeds the configured final budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalRecord {
    pub query: String,
    pub vector_results: usize,
    pub keyword_results: usize,
    pub final_results: usize,
}
