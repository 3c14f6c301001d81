//! Ollama local Embedding (OpenAI compatible, `http://localhost:11434/v1`)

use anyhow::Result;

use crate::common::OpenaiCompatibleEmbed;
use crate::config::ProviderConfig;
use crate::traits::EmbedProvider;

pub fn create(config: &ProviderConfig, dimension: usize) -> Result<Box<dyn EmbedProvider>> {
    // Ollama fixes the dimension per model and does not take a `dimensions` field
    Ok(Box::new(OpenaiCompatibleEmbed::new(config, dimension, false)?))
}
