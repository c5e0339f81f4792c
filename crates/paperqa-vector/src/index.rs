use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use paperqa_core::traits::{Embedder, VectorSearch};
use paperqa_core::types::Chunk;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    dim: usize,
    entries: Vec<IndexEntry>,
}

/// Brute-force cosine-similarity index over chunk embeddings.
///
/// Corpora here are a handful of uploaded papers, so an exact linear scan
/// beats carrying an ANN backend.
pub struct CosineVectorIndex {
    embedder: Box<dyn Embedder>,
    entries: Vec<IndexEntry>,
}

impl std::fmt::Debug for CosineVectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosineVectorIndex")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl CosineVectorIndex {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self { embedder, entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chunk counts per source document, for registry display.
    pub fn source_documents(&self) -> std::collections::BTreeMap<String, usize> {
        let mut counts = std::collections::BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.chunk.source_document.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// All chunks belonging to one source document, in index order.
    pub fn chunks_of(&self, source_document: &str) -> Vec<Chunk> {
        self.entries
            .iter()
            .filter(|e| e.chunk.source_document == source_document)
            .map(|e| e.chunk.clone())
            .collect()
    }

    /// Embed a batch of chunks and append them to the index.
    pub fn index_chunks(&mut self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != chunks.len() {
            bail!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            );
        }
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            if embedding.len() != self.embedder.dim() {
                bail!(
                    "embedding dimension {} does not match embedder dim {}",
                    embedding.len(),
                    self.embedder.dim()
                );
            }
            self.entries.push(IndexEntry { chunk: chunk.clone(), embedding });
        }
        tracing::debug!(total = self.entries.len(), "vector index updated");
        Ok(())
    }

    pub fn search_chunks(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(vec![]);
        }
        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .into_iter()
            .next()
            .context("embedder returned no vector for the query")?;

        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(&query_vec, &e.embedding), e))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored.into_iter().take(k).map(|(_, e)| e.chunk.clone()).collect())
    }

    /// Persist chunks and embeddings to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let persisted = PersistedIndex {
            dim: self.embedder.dim(),
            entries: self.entries.clone(),
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating vector index file {}", path.display()))?;
        serde_json::to_writer(std::io::BufWriter::new(file), &persisted)?;
        Ok(())
    }

    /// Load a previously saved index. The embedder must produce vectors of
    /// the same dimension the index was built with.
    pub fn load(path: &Path, embedder: Box<dyn Embedder>) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening vector index file {}", path.display()))?;
        let persisted: PersistedIndex = serde_json::from_reader(std::io::BufReader::new(file))?;
        if persisted.dim != embedder.dim() {
            bail!(
                "vector index was built with dim {} but the embedder produces dim {}",
                persisted.dim,
                embedder.dim()
            );
        }
        Ok(Self { embedder, entries: persisted.entries })
    }
}

impl VectorSearch for CosineVectorIndex {
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<Chunk>> {
        self.search_chunks(query, k)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
