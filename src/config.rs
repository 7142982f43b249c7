// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Runtime configuration
//!
//! All options are read from environment variables with sensible defaults,
//! so the node can start with nothing but the provider API keys set.

use std::env;
use std::path::PathBuf;

/// Top-level configuration for the node
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenAI API key (embeddings + chat completions)
    pub openai_api_key: String,
    /// Tavily API key (web search fallback)
    pub tavily_api_key: String,
    /// Maximum accepted upload size in megabytes
    pub max_file_size_mb: usize,
    /// Target chunk length in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per query
    pub top_k_chunks: usize,
    /// Session idle timeout in minutes
    pub session_timeout_minutes: u64,
    /// Reaper tick interval in seconds
    pub reaper_interval_secs: u64,
    /// Maximum web search results used in the fallback
    pub max_web_results: usize,
    /// Directory where uploaded PDFs are written
    pub upload_dir: PathBuf,
    /// HTTP bind host
    pub host: String,
    /// HTTP bind port
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            tavily_api_key: env::var("TAVILY_API_KEY").unwrap_or_default(),
            max_file_size_mb: env::var("MAX_FILE_SIZE_MB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            chunk_size: env::var("CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            chunk_overlap: env::var("CHUNK_OVERLAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            top_k_chunks: env::var("TOP_K_CHUNKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            session_timeout_minutes: env::var("SESSION_TIMEOUT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            reaper_interval_secs: env::var("REAPER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            max_web_results: env::var("MAX_WEB_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Chunk size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }
        if self.top_k_chunks == 0 {
            return Err("Top-K chunk count must be greater than 0".to_string());
        }
        if self.max_file_size_mb == 0 {
            return Err("Max file size must be greater than 0".to_string());
        }
        if self.reaper_interval_secs == 0 {
            return Err("Reaper interval must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Maximum accepted upload size in bytes
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            tavily_api_key: String::new(),
            max_file_size_mb: 50,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k_chunks: 3,
            session_timeout_minutes: 30,
            reaper_interval_secs: 300,
            max_web_results: 3,
            upload_dir: PathBuf::from("uploads"),
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
