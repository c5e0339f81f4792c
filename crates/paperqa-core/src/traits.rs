use crate::types::Chunk;

/// Similarity search over an embedding index.
///
/// Results are ranked by decreasing similarity. `k` caps the number of hits.
pub trait VectorSearch: Send + Sync {
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<Chunk>>;
}

/// Ranked lexical search. The number of hits returned is adapter-internal.
pub trait KeywordSearch: Send + Sync {
    fn search(&self, query: &str) -> anyhow::Result<Vec<Chunk>>;
}

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Chat-style text generation.
///
/// Implementations may surface a typed [`crate::error::Error`] (timeout vs
/// generation failure) through the `anyhow` error so callers can apply
/// different handling per kind.
pub trait LanguageModel: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
