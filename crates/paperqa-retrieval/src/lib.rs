#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Hybrid retrieval core: merges dense and lexical search results into a
//! single deduplicated, budget-capped list and records per-query telemetry.

pub mod diagnostics;
pub mod history;
pub mod hybrid;

pub use diagnostics::{RetrievalHealth, Severity};
pub use history::RetrievalHistoryLog;
pub use hybrid::{dedupe_by_fingerprint, HybridRetriever, RetrievalLimits};
