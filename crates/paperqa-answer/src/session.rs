use std::collections::BTreeMap;

use paperqa_core::error::{Error, Result};
use paperqa_core::traits::{KeywordSearch, VectorSearch};
use paperqa_retrieval::{HybridRetriever, RetrievalHistoryLog};

/// Caller-owned session object holding all mutable question-answering
/// state: the index handles, the document registry, generated summaries and
/// the retrieval history.
///
/// Replaces scattered process-wide state with one owner so a reset can
/// never leave the fields half-cleared.
pub struct Session<VS, KS>
where
    VS: VectorSearch,
    KS: KeywordSearch,
{
    retriever: Option<HybridRetriever<VS, KS>>,
    documents: BTreeMap<String, usize>,
    summaries: BTreeMap<String, String>,
    history: RetrievalHistoryLog,
}

impl<VS, KS> Default for Session<VS, KS>
where
    VS: VectorSearch,
    KS: KeywordSearch,
{
    fn default() -> Self {
        Self {
            retriever: None,
            documents: BTreeMap::new(),
            summaries: BTreeMap::new(),
            history: RetrievalHistoryLog::new(),
        }
    }
}

impl<VS, KS> Session<VS, KS>
where
    VS: VectorSearch,
    KS: KeywordSearch,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Index availability signal: both indexes are wired up once a
    /// retriever is attached.
    pub fn is_ready(&self) -> bool {
        self.retriever.is_some()
    }

    pub fn attach_retriever(&mut self, retriever: HybridRetriever<VS, KS>) {
        self.retriever = Some(retriever);
    }

    pub fn retriever(&self) -> Option<&HybridRetriever<VS, KS>> {
        self.retriever.as_ref()
    }

    /// Like [`Self::retriever`] but turns absence into the typed
    /// precondition error, for callers that treat it as a failure rather
    /// than a fixed message.
    pub fn require_retriever(&self) -> Result<&HybridRetriever<VS, KS>> {
        self.retriever.as_ref().ok_or(Error::IndexUnavailable)
    }

    pub fn register_document(&mut self, name: &str, chunk_count: usize) {
        self.documents.insert(name.to_string(), chunk_count);
    }

    pub fn documents(&self) -> &BTreeMap<String, usize> {
        &self.documents
    }

    pub fn add_summary(&mut self, name: &str, summary: String) {
        self.summaries.insert(name.to_string(), summary);
    }

    pub fn summaries(&self) -> &BTreeMap<String, String> {
        &self.summaries
    }

    pub fn history(&self) -> &RetrievalHistoryLog {
        &self.history
    }

    /// Full session reset: drops the index handles and reinitializes every
    /// field in one assignment, so no partially-cleared state is observable.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
