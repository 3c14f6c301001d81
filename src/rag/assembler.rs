use anyhow::{Context, Result};

use tripguide_provider::EmbedProvider;

use super::index::VectorIndex;

/// Retrieves dataset snippets that ground a reply
pub struct ContextAssembler {
    index: VectorIndex,
    embedder: Option<Box<dyn EmbedProvider>>,
}

impl ContextAssembler {
    pub fn new(index: VectorIndex, embedder: Box<dyn EmbedProvider>) -> Self {
        Self {
            index,
            embedder: Some(embedder),
        }
    }

    /// Assembler with nothing to retrieve; every query yields an empty context
    pub fn ungrounded() -> Self {
        Self {
            index: VectorIndex::empty(),
            embedder: None,
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Text of the `k` most similar chunks joined by newlines, best first
    ///
    /// An empty index returns an empty string without touching the embedder.
    /// Embedding or similarity failures are returned to the caller.
    pub async fn assemble_context(&self, query: &str, k: usize) -> Result<String> {
        if self.index.is_empty() || k == 0 {
            return Ok(String::new());
        }
        let Some(embedder) = &self.embedder else {
            return Ok(String::new());
        };

        let query_vector = embedder
            .encode(query)
            .await
            .context("Failed to embed query")?;

        let hits = self
            .index
            .search(&query_vector, k)
            .context("Similarity search failed")?;

        tracing::debug!(
            "Retrieved {} chunks: {:?}",
            hits.len(),
            hits.iter()
                .map(|h| format!("{} ({:.2})", h.chunk.source, h.score))
                .collect::<Vec<_>>()
        );

        Ok(hits
            .iter()
            .map(|hit| hit.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_chunks, FailingEmbedder, KeywordEmbedder};

    async fn assembler() -> ContextAssembler {
        let embedder = KeywordEmbedder::default();
        let index = VectorIndex::build(sample_chunks(), &embedder, 2)
            .await
            .unwrap();
        ContextAssembler::new(index, Box::new(embedder))
    }

    #[tokio::test]
    async fn test_top_k_joined_in_similarity_order() {
        let assembler = assembler().await;
        assert_eq!(assembler.chunk_count(), 3);

        let context = assembler
            .assemble_context("beach hotels in goa", 2)
            .await
            .unwrap();

        assert_eq!(
            context,
            "city: Goa\nhighlights: beaches\ncity: Mumbai\nhighlights: hotels and sea face"
        );
    }

    #[tokio::test]
    async fn test_k_one_returns_single_chunk() {
        let context = assembler()
            .await
            .assemble_context("kerala houseboat", 1)
            .await
            .unwrap();
        assert_eq!(context, "city: Kerala\nhighlights: backwaters");
    }

    #[tokio::test]
    async fn test_empty_index_returns_empty_without_embedding() {
        // A failing embedder proves the empty path never embeds
        let assembler = ContextAssembler::new(VectorIndex::empty(), Box::new(FailingEmbedder));
        let context = assembler.assemble_context("hotel in goa", 2).await.unwrap();
        assert_eq!(context, "");

        let ungrounded = ContextAssembler::ungrounded();
        assert_eq!(ungrounded.assemble_context("anything", 2).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_embedding_failure_is_propagated() {
        let embedder = KeywordEmbedder::default();
        let index = VectorIndex::build(sample_chunks(), &embedder, 8)
            .await
            .unwrap();
        let assembler = ContextAssembler::new(index, Box::new(FailingEmbedder));

        assert!(assembler.assemble_context("goa", 2).await.is_err());
    }
}
