use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::models::{Conversation, ConversationSummary};

/// Unified interface for conversation storage backends
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a conversation, replacing any earlier record with the same id
    async fn save(&self, conversation: &Conversation) -> Result<()>;

    /// Load a conversation by id
    async fn load(&self, id: &str) -> Result<Conversation>;

    /// Most recently modified conversations first, at most `limit`
    async fn list_recent(&self, limit: usize) -> Result<Vec<ConversationSummary>>;

    /// Delete a conversation by id
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Storage configuration (generic)
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}
