use std::fmt;

use paperqa_core::types::RetrievalRecord;

/// Reporting severity for a health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Info,
    Error,
}

/// Health classification of the latest retrieval, derived from its record.
///
/// Conditions are checked in priority order and only the first match is
/// reported: an empty vector result always wins over everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalHealth {
    /// The vector index returned nothing.
    VectorEmpty,
    /// Lexical hits outnumber vector hits by more than 2x.
    KeywordDominant,
    /// Fewer than 3 chunks survived merge, dedupe and truncation.
    SparseResults,
    Healthy,
}

impl RetrievalHealth {
    pub fn assess(record: &RetrievalRecord) -> Self {
        if record.vector_results == 0 {
            Self::VectorEmpty
        } else if record.keyword_results > 2 * record.vector_results {
            Self::KeywordDominant
        } else if record.final_results < 3 {
            Self::SparseResults
        } else {
            Self::Healthy
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::VectorEmpty => Severity::Warning,
            Self::KeywordDominant => Severity::Info,
            Self::SparseResults => Severity::Error,
            Self::Healthy => Severity::Info,
        }
    }
}

impl fmt::Display for RetrievalHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let advice = match self {
            Self::VectorEmpty => {
                "vector search returned nothing; try rephrasing the question or adding more document context"
            }
            Self::KeywordDominant => {
                "keyword search is dominating; consider using more specific concepts or terminology"
            }
            Self::SparseResults => {
                "final result set is small; try simplifying the question or broadening its scope"
            }
            Self::Healthy => "retrieval is healthy",
        };
        f.write_str(advice)
    }
}
