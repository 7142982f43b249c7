// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! pdf-rag-node: session-scoped PDF question answering
//!
//! Upload a PDF into a session, ask questions against it. Answers come
//! from the document when the retrieved context suffices, otherwise from
//! a live web search fallback. Sessions are held in memory and reaped
//! after a configurable idle timeout.

pub mod api;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod indexer;
pub mod llm;
pub mod resolver;
pub mod search;
pub mod service;
pub mod session;
pub mod vector;

pub use config::AppConfig;
pub use errors::{QueryError, ResolutionStage, UploadError};
pub use resolver::{AnswerSource, QueryResolver, ResolutionResult};
pub use service::{QaService, SessionStatus, UploadOutcome};
pub use session::{SessionReaper, SessionStore};
pub use vector::VectorIndex;
