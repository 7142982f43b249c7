// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Error types for the upload and query pipelines
//!
//! The taxonomy separates user-correctable failures (bad file, too large)
//! from provider-side failures (embedding, model, web search) and from
//! caller logic errors (unknown session, no document uploaded yet).

use thiserror::Error;

/// Stage of the query-resolution pipeline at which a provider failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    /// Embedding the question / searching the index
    Retrieval,
    /// Model call answering from document context
    DocumentAnswer,
    /// Web search request
    WebSearch,
    /// Model call answering from web results
    WebAnswer,
}

impl ResolutionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStage::Retrieval => "retrieval",
            ResolutionStage::DocumentAnswer => "document_answer",
            ResolutionStage::WebSearch => "web_search",
            ResolutionStage::WebAnswer => "web_answer",
        }
    }
}

impl std::fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while uploading and indexing a document
#[derive(Error, Debug)]
pub enum UploadError {
    /// Upload exceeds the configured size limit
    #[error("File size exceeds {limit_mb}MB limit")]
    TooLarge { size: usize, limit_mb: usize },

    /// File is not a readable PDF (extension, signature, or structure)
    #[error("Invalid PDF file: {0}")]
    InvalidDocument(String),

    /// Embedding provider or index construction failed
    #[error("Indexing failed: {0}")]
    Indexing(String),
}

impl UploadError {
    /// Error code for logging and API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::TooLarge { .. } => "FILE_TOO_LARGE",
            UploadError::InvalidDocument(_) => "INVALID_DOCUMENT",
            UploadError::Indexing(_) => "INDEXING_FAILURE",
        }
    }

    /// Message safe to return to the caller. Provider detail stays in logs.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Indexing(_) => "Failed to process PDF. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors that can occur while resolving a query against a session
#[derive(Error, Debug)]
pub enum QueryError {
    /// No session with the given id
    #[error("Session not found. Please upload a PDF first.")]
    SessionNotFound,

    /// Session exists but has no document attached
    #[error("No PDF found for this session. Please upload a PDF first.")]
    NoDocument,

    /// A provider failed during resolution; never retried internally
    #[error("Query resolution failed at {stage}: {message}")]
    Resolution {
        stage: ResolutionStage,
        message: String,
    },
}

impl QueryError {
    /// Error code for logging and API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::SessionNotFound => "SESSION_NOT_FOUND",
            QueryError::NoDocument => "NO_DOCUMENT",
            QueryError::Resolution { .. } => "RESOLUTION_FAILURE",
        }
    }

    /// Message safe to return to the caller
    pub fn user_message(&self) -> String {
        match self {
            QueryError::Resolution { .. } => {
                "Failed to process query. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}
