// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Session-scoped vector index for retrieval
//!
//! One index per session, built at upload time, dropped when the session dies.

use anyhow::{anyhow, Result};

use crate::indexer::chunker::Chunk;

/// A single embedding vector
#[derive(Debug, Clone)]
pub struct Embedding {
    data: Vec<f32>,
    dimension: usize,
}

impl Embedding {
    pub fn new(data: Vec<f32>) -> Self {
        let dimension = data.len();
        Self { data, dimension }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn magnitude(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.dimension != other.dimension {
            return 0.0;
        }

        let dot_product: f32 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum();

        let magnitude_self = self.magnitude();
        let magnitude_other = other.magnitude();

        if magnitude_self == 0.0 || magnitude_other == 0.0 {
            0.0
        } else {
            dot_product / (magnitude_self * magnitude_other)
        }
    }
}

/// A chunk scored against a query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Entry held by the index
#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk: Chunk,
    embedding: Embedding,
}

/// In-memory similarity index over a document's chunks
///
/// Immutable once built. Search is a full cosine-similarity scan; document
/// chunk counts are small enough that an ANN structure would be overkill.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexedChunk>,
    dimension: usize,
}

impl VectorIndex {
    /// Build an index from chunks and their embedding vectors
    ///
    /// Fails if the counts differ, the vectors are not all the same
    /// dimension, or any vector contains non-finite values.
    pub fn new(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(anyhow!(
                "Chunk/vector count mismatch: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            ));
        }
        if chunks.is_empty() {
            return Err(anyhow!("Cannot build an index over zero chunks"));
        }

        let dimension = vectors[0].len();
        let mut entries = Vec::with_capacity(chunks.len());

        for (chunk, vector) in chunks.into_iter().zip(vectors.into_iter()) {
            if vector.len() != dimension {
                return Err(anyhow!(
                    "Inconsistent embedding dimensions: expected {}, got {}",
                    dimension,
                    vector.len()
                ));
            }
            if vector.iter().any(|v| v.is_nan() || v.is_infinite()) {
                return Err(anyhow!("Embedding contains NaN or Infinity"));
            }
            entries.push(IndexedChunk {
                chunk,
                embedding: Embedding::new(vector),
            });
        }

        Ok(Self { entries, dimension })
    }

    /// Number of chunks in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension of the index
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top-k chunks most similar to the query vector, highest score first
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let query_embedding = Embedding::new(query.to_vec());

        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: query_embedding.cosine_similarity(&entry.embedding),
            })
            .collect();

        results
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        results
    }
}
