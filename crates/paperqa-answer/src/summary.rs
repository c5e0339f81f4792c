use paperqa_core::traits::LanguageModel;
use paperqa_core::types::Chunk;

/// Only the first few documents of a session get a generated summary.
pub const MAX_SUMMARIZED_DOCUMENTS: usize = 3;

/// Leading chunks fed into the summary prompt.
const SUMMARY_CHUNKS: usize = 3;

/// Generate a short summary for one document from its leading chunks.
///
/// A generation failure is stored as a note instead of aborting ingestion.
pub fn summarize_document(llm: &dyn LanguageModel, chunks: &[Chunk]) -> String {
    let excerpt = chunks
        .iter()
        .take(SUMMARY_CHUNKS)
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let prompt = format!(
        "Summarize the following excerpt from an academic document in two \
         to three sentences, keeping its key claims:\n\n{excerpt}"
    );
    match llm.generate(&prompt) {
        Ok(summary) => summary,
        Err(err) => format!("Summary generation failed: {err}"),
    }
}
