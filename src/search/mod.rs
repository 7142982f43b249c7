// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Web search fallback
//!
//! Used only when the document context cannot answer a question. The
//! resolver sees the [`WebSearchProvider`] trait; Tavily is the production
//! implementation.

pub mod provider;
pub mod tavily;
pub mod types;

use async_trait::async_trait;

pub use provider::WebSearchProvider;
pub use tavily::TavilySearchProvider;
pub use types::{WebSearchError, WebSearchResult, WebSource};

/// Canned web search provider for tests
pub struct MockWebSearch {
    results: Vec<WebSearchResult>,
}

impl MockWebSearch {
    pub fn with_results(results: Vec<WebSearchResult>) -> Self {
        Self { results }
    }

    /// Three plausible results, enough for most fallback tests
    pub fn canned() -> Self {
        Self::with_results(vec![
            WebSearchResult {
                title: Some("First result".to_string()),
                url: Some("https://example.com/1".to_string()),
                content: Some("content of the first result".to_string()),
                snippet: None,
            },
            WebSearchResult {
                title: None,
                url: Some("https://example.com/2".to_string()),
                content: None,
                snippet: Some("snippet of the second result".to_string()),
            },
            WebSearchResult {
                title: Some("Third result".to_string()),
                url: None,
                content: Some("content of the third result".to_string()),
                snippet: None,
            },
        ])
    }
}

#[async_trait]
impl WebSearchProvider for MockWebSearch {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>, WebSearchError> {
        Ok(self.results.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }
}
