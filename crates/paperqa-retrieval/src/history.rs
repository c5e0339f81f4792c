use std::sync::Mutex;

use paperqa_core::types::RetrievalRecord;

/// Append-only, process-lifetime log of retrieval telemetry.
///
/// Insertion order is chronological. Appends are synchronized so records
/// from concurrent questions keep request-completion order; appends are
/// fire-and-forget and never rolled back.
#[derive(Debug, Default)]
pub struct RetrievalHistoryLog {
    records: Mutex<Vec<RetrievalRecord>>,
}

impl RetrievalHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: RetrievalRecord) {
        self.lock().push(record);
    }

    /// Up to the last `n` records, oldest first. Fewer if the history is
    /// shorter; empty if nothing was recorded yet.
    pub fn recent(&self, n: usize) -> Vec<RetrievalRecord> {
        let records = self.lock();
        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }

    pub fn latest(&self) -> Option<RetrievalRecord> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Resets to empty. Only invoked by an explicit full session reset.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RetrievalRecord>> {
        // A poisoned lock only means a panic mid-push; the Vec is still valid.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}
