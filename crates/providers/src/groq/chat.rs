//! Groq Chat Completions (OpenAI compatible, `https://api.groq.com/openai/v1`)

use anyhow::Result;

use crate::common::OpenaiCompatibleChat;
use crate::config::ProviderConfig;
use crate::traits::ChatProvider;

pub fn create(config: &ProviderConfig) -> Result<Box<dyn ChatProvider>> {
    if config.api_key.is_empty() {
        anyhow::bail!("Groq requires an API key (set api_key in providers.toml or GROQ_API_KEY)");
    }
    Ok(Box::new(OpenaiCompatibleChat::new(config)?))
}
