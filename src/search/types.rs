// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Core types for the web search fallback

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw result from a web search provider
///
/// Every field is optional; providers differ in what they populate.
/// Defaults are applied when converting to [`WebSource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: Option<String>,
    pub url: Option<String>,
    /// Full page content or summary, when the provider supplies one
    pub content: Option<String>,
    /// Shorter snippet, used when content is absent
    pub snippet: Option<String>,
}

/// A cited source in a web-backed answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl From<&WebSearchResult> for WebSource {
    fn from(result: &WebSearchResult) -> Self {
        Self {
            title: result.title.clone().unwrap_or_else(|| "Unknown".to_string()),
            url: result.url.clone().unwrap_or_default(),
            snippet: result
                .content
                .clone()
                .or_else(|| result.snippet.clone())
                .unwrap_or_default(),
        }
    }
}

/// Errors that can occur during web search
#[derive(Debug, Error)]
pub enum WebSearchError {
    /// API error from the search provider
    #[error("Search API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Search request could not be sent or timed out
    #[error("Search request failed: {0}")]
    Request(String),

    /// Response body did not match the expected shape
    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    /// No API key configured for the provider
    #[error("No API key configured for {provider}")]
    NoApiKey { provider: String },
}
