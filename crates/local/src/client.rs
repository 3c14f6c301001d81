use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tripguide_types::{Conversation, ConversationStore, ConversationSummary, StoreConfig};

use crate::error::StoreError;

const FILE_PREFIX: &str = "conversation_";
const FILE_EXT: &str = "json";

/// Local conversation store: `<dir>/conversation_<id>.json`
pub struct LocalConversationStore {
    dir: PathBuf,
}

impl LocalConversationStore {
    /// Open the store, creating the history directory if needed
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create history directory: {}",
                    config.path.display()
                )
            })?;

        Ok(Self {
            dir: config.path.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self
            .dir
            .join(format!("{}{}.{}", FILE_PREFIX, id, FILE_EXT)))
    }

    async fn read_conversation(path: &Path) -> Result<Conversation, StoreError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Conversation files with their modification time
    async fn conversation_files(&self) -> Result<Vec<(PathBuf, String, SystemTime)>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to read history directory: {}", self.dir.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(id) = conversation_id_from_path(&path) else {
                continue;
            };

            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(time) => time,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            files.push((path, id, modified));
        }

        Ok(files)
    }
}

#[async_trait]
impl ConversationStore for LocalConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let path = self.file_path(&conversation.id)?;

        // serde_json keeps non-ASCII characters as-is
        let content = serde_json::to_string_pretty(conversation)
            .context("Failed to serialize conversation")?;

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            "Saved conversation {} ({} messages) to {}",
            conversation.id,
            conversation.messages.len(),
            path.display()
        );

        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Conversation> {
        let path = self.file_path(id)?;

        match Self::read_conversation(&path).await {
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()).into())
            }
            other => Ok(other?),
        }
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<ConversationSummary>> {
        let mut files = self.conversation_files().await?;

        // Newest first; ids are timestamp-derived so they break ties the same way
        files.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| b.1.cmp(&a.1)));

        let mut summaries = Vec::new();
        for (path, _, _) in files {
            if summaries.len() >= limit {
                break;
            }

            match Self::read_conversation(&path).await {
                Ok(conversation) => summaries.push(conversation.summary()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable conversation: {}", e);
                }
            }
        }

        Ok(summaries)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.file_path(id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted conversation {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()).into())
            }
            Err(source) => Err(StoreError::Io { path, source }.into()),
        }
    }
}

/// Reject ids that could escape the history directory
fn validate_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && !id.contains("..")
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

fn conversation_id_from_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXT) {
        return None;
    }

    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.strip_prefix(FILE_PREFIX))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
