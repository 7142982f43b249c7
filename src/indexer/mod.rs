// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Document indexing pipeline
//!
//! Turns raw PDF bytes into a searchable [`VectorIndex`]:
//! validate → extract page text → chunk → embed → index.
//! The three validation checks (size, extension, signature) are cheap and
//! always run before any extraction work.

pub mod chunker;
pub mod pdf;

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::embeddings::EmbeddingProvider;
use crate::errors::UploadError;
use crate::vector::VectorIndex;

/// Indexing parameters, carved out of [`AppConfig`]
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub max_file_size_bytes: usize,
    pub max_file_size_mb: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl IndexerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes(),
            max_file_size_mb: config.max_file_size_mb,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        }
    }
}

/// Builds a vector index from an uploaded document
pub struct DocumentIndexer {
    config: IndexerConfig,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl DocumentIndexer {
    pub fn new(config: IndexerConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { config, embedder }
    }

    /// Cheap validation: size limit, extension, signature bytes
    ///
    /// Runs before any extraction or provider call so oversized or
    /// malformed uploads are rejected immediately.
    pub fn validate(&self, bytes: &[u8], filename: &str) -> Result<(), UploadError> {
        if bytes.len() > self.config.max_file_size_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                limit_mb: self.config.max_file_size_mb,
            });
        }

        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(UploadError::InvalidDocument(
                "Invalid file type. Only PDF files are allowed".to_string(),
            ));
        }

        if !bytes.starts_with(pdf::PDF_SIGNATURE) {
            return Err(UploadError::InvalidDocument(
                "File does not start with the PDF signature".to_string(),
            ));
        }

        Ok(())
    }

    /// Build a searchable index over the document
    ///
    /// Returns the index and its chunk count. Chunking is deterministic for
    /// identical input and configuration.
    pub async fn build(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<(VectorIndex, usize), UploadError> {
        self.validate(bytes, filename)?;

        let pages = pdf::extract_pages(bytes)?;
        debug!(pages = pages.len(), "Extracted page text");

        let chunks = chunker::split_pages(&pages, self.config.chunk_size, self.config.chunk_overlap);
        if chunks.is_empty() {
            return Err(UploadError::InvalidDocument(
                "Document produced no text chunks".to_string(),
            ));
        }
        let chunk_count = chunks.len();

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self
            .embedder
            .embed(&texts)
            .await
            .map_err(|e| UploadError::Indexing(e.to_string()))?;

        let index =
            VectorIndex::new(chunks, vectors).map_err(|e| UploadError::Indexing(e.to_string()))?;

        info!(chunks = chunk_count, file = filename, "Document indexed");
        Ok((index, chunk_count))
    }
}
