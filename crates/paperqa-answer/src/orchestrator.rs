use paperqa_core::error::{Error, Result};
use paperqa_core::traits::{KeywordSearch, LanguageModel, VectorSearch};
use paperqa_core::types::Chunk;

use crate::context::{build_context, qa_prompt};
use crate::session::Session;

/// Fixed response when no index has been built yet.
pub const UPLOAD_PROMPT: &str =
    "Please upload and process documents first, then ask your question again.";

/// A synthesized answer plus the chunks it cites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Chunk>,
}

/// Answer `query` from the session's indexes.
///
/// Without an index this returns the fixed upload prompt and an empty
/// source list; no retrieval is attempted and no telemetry is recorded.
/// Adapter failures propagate as typed errors. A language-model failure is
/// folded into the answer text, with the retrieved chunks kept for citation
/// display.
pub fn answer<VS, KS>(
    session: &Session<VS, KS>,
    llm: &dyn LanguageModel,
    query: &str,
) -> Result<Answer>
where
    VS: VectorSearch,
    KS: KeywordSearch,
{
    let Some(retriever) = session.retriever() else {
        return Ok(Answer { text: UPLOAD_PROMPT.to_string(), sources: vec![] });
    };

    let sources = retriever.retrieve(query, session.history())?;
    let prompt = qa_prompt(&build_context(&sources), query);

    let text = match llm.generate(&prompt) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "answer generation failed");
            describe_generation_failure(err)
        }
    };

    Ok(Answer { text, sources })
}

fn describe_generation_failure(err: anyhow::Error) -> String {
    match err.downcast::<Error>() {
        Ok(Error::Timeout(after)) => format!(
            "The answer request timed out after {}s. Please try again.",
            after.as_secs()
        ),
        Ok(typed) => format!("Error while generating the answer: {typed}"),
        Err(other) => format!("Error while generating the answer: {other}"),
    }
}
