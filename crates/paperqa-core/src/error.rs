use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy of the question-answering pipeline.
///
/// Each variant gets distinct handling upstream: a missing index turns into
/// a fixed user-facing message, adapter failures propagate to the caller,
/// and generation failures (including timeouts) are reported inside the
/// answer text instead of aborting the interaction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no document index available; upload and process documents first")]
    IndexUnavailable,

    #[error("vector search failed")]
    VectorSearch(#[source] anyhow::Error),

    #[error("keyword search failed")]
    KeywordSearch(#[source] anyhow::Error),

    #[error("answer generation failed: {0}")]
    Generation(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
