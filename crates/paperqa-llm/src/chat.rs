use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use paperqa_core::error::Error;
use paperqa_core::traits::LanguageModel;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Blocking chat-completions client.
///
/// Timeouts surface as [`Error::Timeout`] and every other failure as
/// [`Error::Generation`], both wrapped in `anyhow` so callers can downcast.
pub struct ChatClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self> {
        Self::with_timeout(base_url, api_key, model, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: crate::DEFAULT_TEMPERATURE,
            timeout,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %self.model, "sending chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(Error::Generation(format!(
                "chat API returned {status}: {body}"
            ))));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| anyhow!(Error::Generation(format!("malformed chat response: {e}"))))?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!(Error::Generation("chat response had no choices".into())))?;
        Ok(answer)
    }

    fn classify(&self, e: reqwest::Error) -> anyhow::Error {
        if e.is_timeout() {
            anyhow!(Error::Timeout(self.timeout))
        } else {
            anyhow!(Error::Generation(e.to_string()))
        }
    }
}

impl LanguageModel for ChatClient {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.complete(prompt)
    }
}
