use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Title used when a conversation has no user message yet
pub const DEFAULT_TITLE: &str = "Travel Chat";

/// Characters of the first user message kept in a title
pub const TITLE_MAX_CHARS: usize = 50;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted conversation (one record per file/row in a backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    /// ISO-8601 time of the last save
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    pub messages: Vec<Message>,
    /// Chat model identifier used for the conversation
    pub model: String,
}

impl Conversation {
    /// Derive a title from the first user message
    ///
    /// Keeps the first 50 characters and appends "..." when the message is longer.
    pub fn title_from_messages(messages: &[Message]) -> String {
        let Some(first) = messages.iter().find(|m| m.role == Role::User) else {
            return DEFAULT_TITLE.to_string();
        };

        let mut title: String = first.content.chars().take(TITLE_MAX_CHARS).collect();
        if first.content.chars().count() > TITLE_MAX_CHARS {
            title.push_str("...");
        }
        title
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            timestamp: self.timestamp,
            message_count: self.messages.len(),
        }
    }
}

/// Listing projection of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    pub message_count: usize,
}

/// Parse an ISO-8601 timestamp; one without a UTC offset is taken as local time
fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(local.offset()))
        .ok_or_else(|| format!("timestamp '{}' does not exist in local time", raw))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Where a knowledge chunk came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChunkSource {
    Csv { path: String, row: usize },
    Pdf { path: String, part: usize },
}

impl fmt::Display for ChunkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkSource::Csv { path, row } => write!(f, "{}#row{}", path, row),
            ChunkSource::Pdf { path, part } => write!(f, "{}#part{}", path, part),
        }
    }
}

/// Immutable text fragment indexed for retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub source: ChunkSource,
}
