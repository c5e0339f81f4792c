#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Client for an OpenAI-compatible chat/embeddings HTTP API (DeepSeek and
//! friends). Implements the `LanguageModel` and `Embedder` contracts.

pub mod chat;
pub mod embeddings;

pub use chat::ChatClient;
pub use embeddings::EmbeddingClient;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_CHAT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
