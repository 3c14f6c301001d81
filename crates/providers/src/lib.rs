mod common;
mod config;
mod traits;

// Per-vendor modules (feature gated)
#[cfg(feature = "groq")]
mod groq;
#[cfg(feature = "ollama")]
mod ollama;
#[cfg(feature = "openai")]
mod openai;

pub use config::ProviderConfig;
pub use traits::{ChatOptions, ChatProvider, EmbedProvider};

/// Create an Embedding Provider
pub fn create_embed_provider(config: &ProviderConfig) -> anyhow::Result<Box<dyn EmbedProvider>> {
    let dimension = config
        .dimension
        .ok_or_else(|| anyhow::anyhow!("Missing 'dimension' for embed provider"))?;

    match config.provider_name.as_str() {
        #[cfg(feature = "openai")]
        "openai" => openai::embed::create(config, dimension),
        #[cfg(feature = "ollama")]
        "ollama" => ollama::embed::create(config, dimension),
        other => anyhow::bail!("Unknown or disabled embed provider: {}", other),
    }
}

/// Create a Chat Provider
pub fn create_chat_provider(config: &ProviderConfig) -> anyhow::Result<Box<dyn ChatProvider>> {
    match config.provider_name.as_str() {
        #[cfg(feature = "groq")]
        "groq" => groq::chat::create(config),
        #[cfg(feature = "openai")]
        "openai" => openai::chat::create(config),
        #[cfg(feature = "ollama")]
        "ollama" => ollama::chat::create(config),
        other => anyhow::bail!("Unknown or disabled chat provider: {}", other),
    }
}
