//! Provider Traits

use anyhow::Result;
use async_trait::async_trait;

/// Embedding Provider Trait
#[async_trait]
pub trait EmbedProvider: Send + Sync {
    /// Encode a single text
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode a batch of texts, one vector per input in input order
    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Vector dimension
    fn dimension(&self) -> usize;
}

/// Sampling options for one chat completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat completion Provider Trait
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `prompt` as a single user message and return the first choice's text
    async fn chat(&self, model: &str, prompt: &str, options: &ChatOptions) -> Result<String>;
}
