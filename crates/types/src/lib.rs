//! Shared types for tripguide
//!
//! Conversation records, knowledge chunks and the storage trait that every
//! conversation backend implements.

mod models;
mod storage;

pub use models::{ChunkSource, Conversation, ConversationSummary, DocumentChunk, Message, Role};
pub use storage::{ConversationStore, StoreConfig};
