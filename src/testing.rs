//! Test doubles for the embedding and chat providers

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use tripguide_provider::{ChatOptions, ChatProvider, EmbedProvider};
use tripguide_types::{ChunkSource, DocumentChunk};

const VOCABULARY: [&str; 6] = ["goa", "kerala", "mumbai", "beach", "hotel", "backwater"];

/// Embeds text as keyword presence over a tiny vocabulary
#[derive(Default)]
pub struct KeywordEmbedder;

#[async_trait]
impl EmbedProvider for KeywordEmbedder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(VOCABULARY
            .iter()
            .map(|word| if lower.contains(word) { 1.0 } else { 0.0 })
            .collect())
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.encode(text).await?);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        VOCABULARY.len()
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl EmbedProvider for FailingEmbedder {
    async fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        anyhow::bail!("embedding service unavailable")
    }

    async fn encode_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        anyhow::bail!("embedding service unavailable")
    }

    fn dimension(&self) -> usize {
        VOCABULARY.len()
    }
}

/// Chat provider returning a fixed reply and recording every call
pub struct ScriptedChat {
    reply: Result<String, String>,
    pub calls: Mutex<Vec<(String, String, ChatOptions)>>,
}

impl ScriptedChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, prompt, _)| prompt.clone())
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn chat(&self, model: &str, prompt: &str, options: &ChatOptions) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string(), *options));

        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(e) => anyhow::bail!("{}", e),
        }
    }
}

pub fn sample_chunks() -> Vec<DocumentChunk> {
    [
        "city: Goa\nhighlights: beaches",
        "city: Kerala\nhighlights: backwaters",
        "city: Mumbai\nhighlights: hotels and sea face",
    ]
    .into_iter()
    .enumerate()
    .map(|(row, content)| DocumentChunk {
        content: content.to_string(),
        source: ChunkSource::Csv {
            path: "data/travel.csv".to_string(),
            row,
        },
    })
    .collect()
}
