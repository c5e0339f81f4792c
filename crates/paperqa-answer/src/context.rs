use paperqa_core::types::Chunk;

/// Content preview budget per chunk when building the generation context.
pub const CONTEXT_PREVIEW_CHARS: usize = 500;

/// Render retrieved chunks into the textual context block handed to the
/// language model: source name, 1-based page and a bounded content preview
/// per chunk, entries separated by blank lines.
pub fn build_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            format!(
                "Source document: {}\nPage: {}\nContent: {}",
                chunk.source_document,
                chunk.page_number + 1,
                preview(&chunk.content, CONTEXT_PREVIEW_CHARS),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `max_chars` characters of `text`, with an ellipsis marker when
/// something was cut off.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

pub fn qa_prompt(context: &str, question: &str) -> String {
    format!(
        "[Role]\n\
         You are an academic literature analysis assistant. Answer strictly \
         based on the literature context below:\n{context}\n\n\
         [Question]\n{question}\n\n\
         [Instructions]\n\
         1. Give a detailed, accurate answer and cite the source documents \
         and page numbers you relied on. Summarize rather than repeating \
         the text verbatim.\n\
         2. When the context spans several documents, connect them: compare \
         their viewpoints and methods where relevant.\n\
         3. Keep the answer concise, clearly structured and on topic.\n\
         4. If the question is not covered by the context, answer only: \
         \"Sorry, I could not find the relevant content in the provided \
         documents.\""
    )
}
