use anyhow::{Context, Result};

use tripguide_provider::EmbedProvider;
use tripguide_types::DocumentChunk;

struct IndexedChunk {
    chunk: DocumentChunk,
    vector: Vec<f32>,
}

/// A chunk returned by a similarity search
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a DocumentChunk,
    pub score: f32,
}

/// In-memory vector index, built once and read-only afterwards
#[derive(Default)]
pub struct VectorIndex {
    entries: Vec<IndexedChunk>,
    dimension: usize,
}

impl VectorIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Embed every chunk in batches and index it
    pub async fn build(
        chunks: Vec<DocumentChunk>,
        embedder: &dyn EmbedProvider,
        batch_size: usize,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(chunks.len());
        let batch_size = batch_size.max(1);
        let expected = embedder.dimension();

        for (batch_index, batch) in chunks.chunks(batch_size).enumerate() {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let vectors = embedder
                .encode_batch(&texts)
                .await
                .with_context(|| format!("Failed to embed chunk batch {}", batch_index + 1))?;

            if vectors.len() != batch.len() {
                anyhow::bail!(
                    "Embedding returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                );
            }

            if let Some(vector) = vectors.iter().find(|v| v.len() != expected) {
                anyhow::bail!(
                    "Embedding returned {}-dimensional vectors, provider is configured for {}",
                    vector.len(),
                    expected
                );
            }

            tracing::debug!("Embedded batch {} ({} chunks)", batch_index + 1, batch.len());

            entries.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(vectors)
                    .map(|(chunk, vector)| IndexedChunk { chunk, vector }),
            );
        }

        Self::from_entries(entries)
    }

    /// Index chunks with vectors computed elsewhere
    pub fn from_embedded(pairs: Vec<(DocumentChunk, Vec<f32>)>) -> Result<Self> {
        Self::from_entries(
            pairs
                .into_iter()
                .map(|(chunk, vector)| IndexedChunk { chunk, vector })
                .collect(),
        )
    }

    fn from_entries(entries: Vec<IndexedChunk>) -> Result<Self> {
        let dimension = entries.first().map(|e| e.vector.len()).unwrap_or(0);
        if let Some(bad) = entries.iter().find(|e| e.vector.len() != dimension) {
            anyhow::bail!(
                "Vector dimension mismatch: expected {}, got {} ({})",
                dimension,
                bad.vector.len(),
                bad.chunk.source
            );
        }

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `k` chunks by cosine similarity, best first
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk<'_>>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            anyhow::bail!(
                "Vector dimension mismatch: expected {}, got {}",
                self.dimension,
                query.len()
            );
        }

        let mut scored: Vec<ScoredChunk<'_>> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: &entry.chunk,
                score: cosine_similarity(query, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let similarity = dot / (norm_a * norm_b);
    if similarity.is_nan() {
        0.0
    } else {
        similarity
    }
}
