// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Server entry point

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use pdf_rag_node::api::{build_router, AppState};
use pdf_rag_node::config::AppConfig;
use pdf_rag_node::embeddings::OpenAiEmbeddings;
use pdf_rag_node::llm::OpenAiChatModel;
use pdf_rag_node::search::TavilySearchProvider;
use pdf_rag_node::service::QaService;
use pdf_rag_node::session::{SessionReaper, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; uploads and queries will fail");
    }
    if config.tavily_api_key.is_empty() {
        warn!("TAVILY_API_KEY is not set; web search fallback is unavailable");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let embedder = Arc::new(OpenAiEmbeddings::new(config.openai_api_key.clone()));
    let model = Arc::new(OpenAiChatModel::new(config.openai_api_key.clone()));
    let web = Arc::new(TavilySearchProvider::new(config.tavily_api_key.clone()));

    let store = Arc::new(SessionStore::new());
    let service = Arc::new(QaService::new(
        &config,
        store.clone(),
        embedder,
        model,
        web,
    ));

    let reaper = SessionReaper::spawn(
        store.clone(),
        Duration::from_secs(config.reaper_interval_secs),
        Duration::from_secs(config.session_timeout_minutes * 60),
    );

    let router = build_router(AppState { service }, config.max_file_size_bytes());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "pdf-rag-node listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    reaper.shutdown().await;
    let released = store.release_all().await;
    if released > 0 {
        info!(released, "Released sessions on shutdown");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install shutdown signal handler");
    }
}
