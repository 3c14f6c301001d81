//! Tripguide Local - JSON file conversation storage
//!
//! This crate implements the ConversationStore trait with one pretty-printed
//! JSON file per conversation under a single history directory.

mod client;
mod error;

// Re-export the client (implements ConversationStore)
pub use client::LocalConversationStore;
pub use error::StoreError;
