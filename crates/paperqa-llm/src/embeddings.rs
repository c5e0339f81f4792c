use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use paperqa_core::traits::Embedder;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Blocking embeddings client for the same OpenAI-compatible surface.
///
/// `dim` is declared up front; responses with a different dimension are
/// rejected so the vector index never mixes vector spaces.
pub struct EmbeddingClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    dim: usize,
}

impl EmbeddingClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, dim: usize) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            dim,
        })
    }
}

impl Embedder for EmbeddingClient {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let url = format!("{}/embeddings", self.base_url);
        tracing::debug!(model = %self.model, batch = texts.len(), "requesting embeddings");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest { model: &self.model, input: texts })
            .send()
            .context("embedding request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("embedding API returned {status}: {body}");
        }

        let parsed: EmbeddingResponse = response.json().context("malformed embedding response")?;
        if parsed.data.len() != texts.len() {
            bail!(
                "embedding API returned {} vectors for {} inputs",
                parsed.data.len(),
                texts.len()
            );
        }
        let mut embeddings = Vec::with_capacity(parsed.data.len());
        for data in parsed.data {
            if data.embedding.len() != self.dim {
                bail!(
                    "embedding dimension {} does not match configured dim {}",
                    data.embedding.len(),
                    self.dim
                );
            }
            embeddings.push(data.embedding);
        }
        Ok(embeddings)
    }
}
