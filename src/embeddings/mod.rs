// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Embedding provider abstraction
//!
//! The indexer and resolver only see the [`EmbeddingProvider`] trait; the
//! concrete implementation (OpenAI, or the deterministic mock used in
//! tests) is chosen at startup.

pub mod openai;

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

pub use openai::OpenAiEmbeddings;

/// Errors from an embedding provider
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// API returned a non-success status
    #[error("Embedding API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Request could not be sent or timed out
    #[error("Embedding request failed: {0}")]
    Request(String),

    /// Response body did not match the expected shape
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Trait for computing embedding vectors over batches of text
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed each text, returning one vector per input in the same order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Deterministic bag-of-words embedder for tests and offline runs
///
/// Hashes each whitespace token into a fixed-dimension bucket and
/// normalizes the result, so texts sharing words land near each other
/// under cosine similarity. Not a real semantic embedding.
pub struct MockEmbeddings {
    dimension: usize,
}

impl MockEmbeddings {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text.to_lowercase().split_whitespace() {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric());
            if token.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimension;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }
        vector
    }
}

impl Default for MockEmbeddings {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddings {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
