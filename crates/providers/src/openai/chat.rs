//! OpenAI Chat Completions

use anyhow::Result;

use crate::common::OpenaiCompatibleChat;
use crate::config::ProviderConfig;
use crate::traits::ChatProvider;

pub fn create(config: &ProviderConfig) -> Result<Box<dyn ChatProvider>> {
    Ok(Box::new(OpenaiCompatibleChat::new(config)?))
}
