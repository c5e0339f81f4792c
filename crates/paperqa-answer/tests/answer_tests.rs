use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use paperqa_answer::context::{build_context, preview};
use paperqa_answer::summary::summarize_document;
use paperqa_answer::{answer, Session, UPLOAD_PROMPT};
use paperqa_core::error::Error;
use paperqa_core::traits::{KeywordSearch, LanguageModel, VectorSearch};
use paperqa_core::types::Chunk;
use paperqa_retrieval::HybridRetriever;

fn chunk(content: &str, source: &str, page: usize) -> Chunk {
    Chunk {
        content: content.to_string(),
        source_document: source.to_string(),
        page_number: page,
    }
}

struct FixedVector(Vec<Chunk>);

impl VectorSearch for FixedVector {
    fn search(&self, _query: &str, k: usize) -> anyhow::Result<Vec<Chunk>> {
        Ok(self.0.iter().take(k).cloned().collect())
    }
}

struct FixedKeyword(Vec<Chunk>);

impl KeywordSearch for FixedKeyword {
    fn search(&self, _query: &str) -> anyhow::Result<Vec<Chunk>> {
        Ok(self.0.clone())
    }
}

/// Records every prompt it sees and replies with a canned answer.
struct CapturingLlm {
    prompts: Mutex<Vec<String>>,
}

impl CapturingLlm {
    fn new() -> Self {
        Self { prompts: Mutex::new(vec![]) }
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl LanguageModel for CapturingLlm {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("Synthesized answer with citations.".to_string())
    }
}

struct FailingLlm;

impl LanguageModel for FailingLlm {
    fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Err(anyhow!(Error::Generation("model unavailable".into())))
    }
}

struct TimeoutLlm;

impl LanguageModel for TimeoutLlm {
    fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Err(anyhow!(Error::Timeout(Duration::from_secs(60))))
    }
}

fn ready_session(chunks: Vec<Chunk>) -> Session<FixedVector, FixedKeyword> {
    let mut session = Session::new();
    session.attach_retriever(HybridRetriever::new(FixedVector(chunks), FixedKeyword(vec![])));
    session
}

#[test]
fn no_index_returns_upload_prompt_without_telemetry() {
    let session: Session<FixedVector, FixedKeyword> = Session::new();
    let llm = CapturingLlm::new();

    let result = answer(&session, &llm, "what is this paper about?").expect("answer");

    assert_eq!(result.text, UPLOAD_PROMPT);
    assert!(result.sources.is_empty());
    assert!(session.history().is_empty(), "no retrieval, no record");
    assert!(llm.last_prompt().is_empty(), "the model is never called");
}

#[test]
fn answer_builds_context_and_records_telemetry() {
    let session = ready_session(vec![chunk("embodied agents learn by acting", "survey.txt", 2)]);
    let llm = CapturingLlm::new();

    let result = answer(&session, &llm, "what do embodied agents do?").expect("answer");

    assert_eq!(result.text, "Synthesized answer with citations.");
    assert_eq!(result.sources.len(), 1);

    let prompt = llm.last_prompt();
    assert!(prompt.contains("Source document: survey.txt"));
    assert!(prompt.contains("Page: 3"), "pages are 1-based in the context");
    assert!(prompt.contains("embodied agents learn by acting"));
    assert!(prompt.contains("what do embodied agents do?"));

    let record = session.history().latest().expect("record");
    assert_eq!(record.final_results, result.sources.len());
}

#[test]
fn generation_failure_is_reported_in_text_and_keeps_sources() {
    let session = ready_session(vec![chunk("some passage", "doc.txt", 0)]);

    let result = answer(&session, &FailingLlm, "q").expect("answer");

    assert!(result.text.contains("model unavailable"), "got: {}", result.text);
    assert_eq!(result.sources.len(), 1, "citations survive a failed generation");
}

#[test]
fn timeout_gets_its_own_message() {
    let session = ready_session(vec![chunk("some passage", "doc.txt", 0)]);

    let result = answer(&session, &TimeoutLlm, "q").expect("answer");

    assert!(result.text.contains("timed out after 60s"), "got: {}", result.text);
}

#[test]
fn context_preview_truncates_at_500_chars() {
    let long = "y".repeat(600);
    let rendered = build_context(&[chunk(&long, "long.txt", 0)]);

    assert!(rendered.contains(&format!("{}...", "y".repeat(500))));
    assert!(!rendered.contains(&"y".repeat(501)));

    let short = preview("short text", 500);
    assert_eq!(short, "short text", "no ellipsis when nothing was cut");
}

#[test]
fn context_entries_are_blank_line_separated() {
    let rendered = build_context(&[
        chunk("first passage", "a.txt", 0),
        chunk("second passage", "b.txt", 1),
    ]);

    let entries: Vec<&str> = rendered.split("\n\n").collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].starts_with("Source document: a.txt"));
    assert!(entries[1].starts_with("Source document: b.txt"));
}

#[test]
fn reset_clears_all_session_state_at_once() {
    let mut session = ready_session(vec![chunk("passage", "doc.txt", 0)]);
    session.register_document("doc.txt", 1);
    session.add_summary("doc.txt", "a summary".to_string());
    let llm = CapturingLlm::new();
    answer(&session, &llm, "q").expect("answer");
    assert!(!session.history().is_empty());

    session.reset();

    assert!(!session.is_ready());
    assert!(session.documents().is_empty());
    assert!(session.summaries().is_empty());
    assert!(session.history().is_empty());
}

#[test]
fn require_retriever_signals_typed_precondition() {
    let session: Session<FixedVector, FixedKeyword> = Session::new();
    assert!(matches!(session.require_retriever(), Err(Error::IndexUnavailable)));

    let session = ready_session(vec![]);
    assert!(session.require_retriever().is_ok());
}

#[test]
fn summary_failure_becomes_a_note() {
    let chunks = vec![chunk("intro", "doc.txt", 0)];

    let summary = summarize_document(&FailingLlm, &chunks);
    assert!(summary.starts_with("Summary generation failed"));

    let llm = CapturingLlm::new();
    let summary = summarize_document(&llm, &chunks);
    assert_eq!(summary, "Synthesized answer with citations.");
    assert!(llm.last_prompt().contains("intro"));
}
