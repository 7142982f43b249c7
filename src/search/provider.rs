// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Web search provider trait definition

use async_trait::async_trait;

use super::types::{WebSearchError, WebSearchResult};

/// Trait for implementing web search providers
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Perform a web search
    ///
    /// Returns at most `max_results` results, most relevant first.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>, WebSearchError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Whether the provider is usable (has an API key, etc.)
    fn is_available(&self) -> bool;
}
