// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Query resolution
//!
//! Two-stage pipeline per query: try to answer from the session's document
//! index, and fall back to live web search when the model signals that the
//! retrieved context is insufficient. The same model invocation both
//! answers and signals insufficiency, so the common path costs one
//! round-trip. Provider failures are never retried here; they surface as
//! [`QueryError::Resolution`] tagged with the failing stage.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::embeddings::EmbeddingProvider;
use crate::errors::{QueryError, ResolutionStage};
use crate::llm::{parse_model_answer, LanguageModel, INSUFFICIENT_CONTEXT_SENTINEL};
use crate::search::{WebSearchProvider, WebSource};
use crate::vector::VectorIndex;

/// Where the answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Document,
    Web,
}

/// Structured outcome of a resolved query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub answer: String,
    pub source: AnswerSource,
    /// Present iff the answer came from the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_used: Option<usize>,
    /// Present iff the answer came from the web
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_sources: Option<Vec<WebSource>>,
}

/// Resolution parameters
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Number of chunks retrieved per query
    pub top_k: usize,
    /// Maximum web results used in the fallback
    pub max_web_results: usize,
}

/// Executes the retrieval-then-fallback pipeline
pub struct QueryResolver {
    config: ResolverConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn LanguageModel>,
    web: Arc<dyn WebSearchProvider>,
}

impl QueryResolver {
    pub fn new(
        config: ResolverConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn LanguageModel>,
        web: Arc<dyn WebSearchProvider>,
    ) -> Self {
        Self {
            config,
            embedder,
            model,
            web,
        }
    }

    /// Resolve a question against a document index
    pub async fn resolve(
        &self,
        index: &VectorIndex,
        question: &str,
    ) -> Result<ResolutionResult, QueryError> {
        debug!(question = %truncate(question, 100), "Resolving query");

        // Document attempt: retrieve top-k context and ask the model
        let query_vector = self
            .embedder
            .embed(&[question.to_string()])
            .await
            .map_err(|e| resolution_error(ResolutionStage::Retrieval, e))?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::Resolution {
                stage: ResolutionStage::Retrieval,
                message: "Embedding provider returned no vector".to_string(),
            })?;

        let ranked = index.search(&query_vector, self.config.top_k);
        let context = ranked
            .iter()
            .map(|scored| scored.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let raw = self
            .model
            .complete(&document_prompt(&context, question))
            .await
            .map_err(|e| resolution_error(ResolutionStage::DocumentAnswer, e))?;

        let parsed = parse_model_answer(&raw);
        if parsed.sufficient {
            info!("Answer generated from document");
            return Ok(ResolutionResult {
                answer: parsed.answer,
                source: AnswerSource::Document,
                chunks_used: Some(self.config.top_k),
                web_sources: None,
            });
        }

        info!("Document context insufficient, falling back to web search");
        self.web_fallback(question).await
    }

    /// Web fallback: search, then ask the model to synthesize from results.
    /// The document context is deliberately not included in this prompt.
    async fn web_fallback(&self, question: &str) -> Result<ResolutionResult, QueryError> {
        let results = self
            .web
            .search(question, self.config.max_web_results)
            .await
            .map_err(|e| resolution_error(ResolutionStage::WebSearch, e))?;

        let results_block = results
            .iter()
            .map(|r| {
                format!(
                    "Title: {}\nContent: {}\nURL: {}",
                    r.title.as_deref().unwrap_or(""),
                    r.content.as_deref().or(r.snippet.as_deref()).unwrap_or(""),
                    r.url.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let answer = self
            .model
            .complete(&web_prompt(question, &results_block))
            .await
            .map_err(|e| resolution_error(ResolutionStage::WebAnswer, e))?;

        let web_sources: Vec<WebSource> = results.iter().map(WebSource::from).collect();

        info!(sources = web_sources.len(), "Answer generated from web search");
        Ok(ResolutionResult {
            answer: answer.trim().to_string(),
            source: AnswerSource::Web,
            chunks_used: None,
            web_sources: Some(web_sources),
        })
    }
}

fn resolution_error(stage: ResolutionStage, err: impl std::fmt::Display) -> QueryError {
    QueryError::Resolution {
        stage,
        message: err.to_string(),
    }
}

/// Prompt for the document attempt. Instructs the model to answer only from
/// the given context, or emit the sentinel verbatim when it cannot.
fn document_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an AI assistant tasked with determining if the provided context \
from a PDF contains sufficient information to answer a user's question.\n\n\
Context from PDF: {context}\n\n\
User Question: {question}\n\n\
First, carefully analyze if the context provides adequate information to answer the question.\n\n\
If the context contains sufficient information to answer the question, respond with a \
complete and accurate answer based ONLY on the provided context.\n\n\
If the context does NOT contain sufficient information to fully answer the question, \
respond with exactly: \"{sentinel}\"\n\n\
Your response:",
        context = context,
        question = question,
        sentinel = INSUFFICIENT_CONTEXT_SENTINEL,
    )
}

/// Prompt for the web fallback
fn web_prompt(question: &str, web_results: &str) -> String {
    format!(
        "You are an AI assistant helping a user with their question.\n\n\
User Question: {question}\n\n\
Web Search Results: {web_results}\n\n\
Using the web search results, provide a comprehensive and accurate answer to the \
user's question.\n\
Make sure to cite sources from the search results where appropriate.",
        question = question,
        web_results = web_results,
    )
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
