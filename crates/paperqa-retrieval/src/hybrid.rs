use std::collections::HashSet;

use paperqa_core::error::{Error, Result};
use paperqa_core::traits::{KeywordSearch, VectorSearch};
use paperqa_core::types::{Chunk, RetrievalRecord};

use crate::history::RetrievalHistoryLog;

/// Knobs controlling recall vs precision of a hybrid retrieval call.
///
/// There is no unified relevance score across the two signals; these limits
/// and the keyword adapter's internal K are the only tuning surface.
#[derive(Debug, Clone)]
pub struct RetrievalLimits {
    /// Top-K requested from the vector index per query.
    pub vector_k: usize,
    /// Maximum number of chunks surfaced to the answer stage.
    pub final_budget: usize,
}

impl Default for RetrievalLimits {
    fn default() -> Self {
        Self { vector_k: 4, final_budget: 6 }
    }
}

/// Combines one dense and one lexical retrieval signal into a single ranked,
/// deduplicated result list.
///
/// The merge is an order-preserving concatenation (vector hits first, so the
/// vector-derived copy of a chunk wins ties) followed by a stable dedupe on
/// chunk fingerprints and truncation to the final budget. No score fusion.
pub struct HybridRetriever<VS, KS>
where
    VS: VectorSearch,
    KS: KeywordSearch,
{
    vector: VS,
    keyword: KS,
    limits: RetrievalLimits,
}

impl<VS, KS> HybridRetriever<VS, KS>
where
    VS: VectorSearch,
    KS: KeywordSearch,
{
    pub fn new(vector: VS, keyword: KS) -> Self {
        Self::with_limits(vector, keyword, RetrievalLimits::default())
    }

    pub fn with_limits(vector: VS, keyword: KS, limits: RetrievalLimits) -> Self {
        Self { vector, keyword, limits }
    }

    pub fn vector_index(&self) -> &VS {
        &self.vector
    }

    /// Retrieve the best chunks for `query` and append one telemetry record
    /// to `history`.
    ///
    /// The two index queries are independent; running them sequentially
    /// produces the same result as running them concurrently. Adapter
    /// failures propagate as typed errors without retry, and no telemetry is
    /// recorded for a failed retrieval.
    pub fn retrieve(&self, query: &str, history: &RetrievalHistoryLog) -> Result<Vec<Chunk>> {
        let vector_hits = self
            .vector
            .search(query, self.limits.vector_k)
            .map_err(Error::VectorSearch)?;
        let keyword_hits = self.keyword.search(query).map_err(Error::KeywordSearch)?;

        let vector_results = vector_hits.len();
        let keyword_results = keyword_hits.len();

        let mut merged = dedupe_by_fingerprint(
            vector_hits.into_iter().chain(keyword_hits).collect(),
        );
        merged.truncate(self.limits.final_budget);

        tracing::debug!(
            query,
            vector_results,
            keyword_results,
            final_results = merged.len(),
            "hybrid retrieval complete"
        );

        // Recorded unconditionally, even when the final list is empty.
        history.append(RetrievalRecord {
            query: query.to_string(),
            vector_results,
            keyword_results,
            final_results: merged.len(),
        });

        Ok(merged)
    }
}

/// Stable dedupe: walk once, keep the first occurrence of each fingerprint.
///
/// Order is preserved, so when the same chunk appears in both signals the
/// earlier (vector-derived) copy survives.
pub fn dedupe_by_fingerprint(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if seen.insert(chunk.fingerprint()) {
            unique.push(chunk);
        }
    }
    unique
}
