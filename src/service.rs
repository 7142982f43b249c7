// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Service facade tying sessions, indexing and resolution together
//!
//! The HTTP layer calls only this type. Uploads validate the document
//! before anything touches disk, so rejected files leave no artifacts
//! behind.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::embeddings::EmbeddingProvider;
use crate::errors::{QueryError, UploadError};
use crate::indexer::{DocumentIndexer, IndexerConfig};
use crate::llm::LanguageModel;
use crate::resolver::{QueryResolver, ResolutionResult, ResolverConfig};
use crate::search::WebSearchProvider;
use crate::session::store::StoreError;
use crate::session::SessionStore;

/// Result of a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub session_id: String,
    pub document_name: String,
    pub chunk_count: usize,
}

/// Introspectable session state for the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub has_document: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Document question-answering service
pub struct QaService {
    store: Arc<SessionStore>,
    indexer: DocumentIndexer,
    resolver: QueryResolver,
    upload_dir: PathBuf,
}

impl QaService {
    pub fn new(
        config: &AppConfig,
        store: Arc<SessionStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn LanguageModel>,
        web: Arc<dyn WebSearchProvider>,
    ) -> Self {
        let indexer = DocumentIndexer::new(IndexerConfig::from_app_config(config), embedder.clone());
        let resolver = QueryResolver::new(
            ResolverConfig {
                top_k: config.top_k_chunks,
                max_web_results: config.max_web_results,
            },
            embedder,
            model,
            web,
        );

        Self {
            store,
            indexer,
            resolver,
            upload_dir: config.upload_dir.clone(),
        }
    }

    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    /// Ingest a document into a session
    ///
    /// An unknown or absent `session_id` gets a fresh session. A re-upload
    /// into an existing session replaces its document. The raw file is kept
    /// on disk as the session's artifact and deleted when the session ends.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        session_id: Option<&str>,
    ) -> Result<UploadOutcome, UploadError> {
        self.indexer.validate(&bytes, filename)?;

        let session_id = match session_id {
            Some(id) if self.store.exists(id).await => id.to_string(),
            _ => self.store.create().await,
        };

        let artifact_path = self.save_artifact(&bytes, filename).await?;

        let (index, chunk_count) = match self.indexer.build(&bytes, filename).await {
            Ok(built) => built,
            Err(e) => {
                // Failed upload must not leak the saved file
                if let Err(io) = tokio::fs::remove_file(&artifact_path).await {
                    warn!(path = %artifact_path.display(), error = %io, "Failed to remove artifact after indexing error");
                }
                return Err(e);
            }
        };

        let document_name = base_name(filename);
        let attached = self
            .store
            .attach_index(
                &session_id,
                Arc::new(index),
                document_name.clone(),
                chunk_count,
                Some(artifact_path.clone()),
            )
            .await;

        if let Err(StoreError::NotFound) = attached {
            // Session was cleared while we were indexing
            if let Err(io) = tokio::fs::remove_file(&artifact_path).await {
                warn!(path = %artifact_path.display(), error = %io, "Failed to remove orphaned artifact");
            }
            return Err(UploadError::Indexing(
                "Session was cleared during indexing".to_string(),
            ));
        }

        info!(
            session_id = %session_id,
            document = %document_name,
            chunks = chunk_count,
            "Document indexed"
        );

        Ok(UploadOutcome {
            session_id,
            document_name,
            chunk_count,
        })
    }

    /// Answer a question against a session's document
    pub async fn resolve_query(
        &self,
        session_id: &str,
        question: &str,
    ) -> Result<ResolutionResult, QueryError> {
        let snapshot = self
            .store
            .get(session_id)
            .await
            .ok_or(QueryError::SessionNotFound)?;

        let index = snapshot.index.ok_or(QueryError::NoDocument)?;
        self.resolver.resolve(&index, question).await
    }

    /// Current state of a session, if it exists
    pub async fn get_status(&self, session_id: &str) -> Option<SessionStatus> {
        let snapshot = self.store.get(session_id).await?;
        let has_document = snapshot.has_document();
        Some(SessionStatus {
            session_id: snapshot.session_id,
            has_document,
            document_name: snapshot.document_name,
            chunk_count: snapshot.chunk_count,
            created_at: snapshot.created_at,
            last_active: snapshot.last_active,
        })
    }

    /// Remove a session and its resources. Returns false if unknown.
    pub async fn clear_session(&self, session_id: &str) -> bool {
        self.store.clear(session_id).await
    }

    async fn save_artifact(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, UploadError> {
        let unique: [u8; 8] = rand::random();
        let path = self
            .upload_dir
            .join(format!("{}_{}", hex::encode(unique), base_name(filename)));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| UploadError::Indexing(format!("Failed to save uploaded file: {}", e)))?;

        Ok(path)
    }
}

/// Strip any path components a client may have smuggled into the filename
fn base_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string())
}
