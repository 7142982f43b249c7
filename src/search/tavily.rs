// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Tavily Search API provider
//!
//! Tavily is purpose-built for LLM retrieval and returns page content
//! alongside the usual title/url, which the fallback prompt uses directly.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::provider::WebSearchProvider;
use super::types::{WebSearchError, WebSearchResult};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Tavily Search API provider
pub struct TavilySearchProvider {
    api_key: String,
    api_url: String,
    client: Client,
}

impl TavilySearchProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            api_url: TAVILY_API_URL.to_string(),
            client,
        }
    }

    /// Override the endpoint URL (tests, proxies)
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }
}

#[async_trait]
impl WebSearchProvider for TavilySearchProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>, WebSearchError> {
        if self.api_key.is_empty() {
            return Err(WebSearchError::NoApiKey {
                provider: "tavily".to_string(),
            });
        }

        let response = self
            .client
            .post(&self.api_url)
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await
            .map_err(|e| WebSearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WebSearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: TavilyResponse = response
            .json()
            .await
            .map_err(|e| WebSearchError::InvalidResponse(e.to_string()))?;

        Ok(data
            .results
            .into_iter()
            .take(max_results)
            .map(|r| WebSearchResult {
                title: r.title,
                url: r.url,
                content: r.content,
                snippet: r.snippet,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "tavily"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    snippet: Option<String>,
}
