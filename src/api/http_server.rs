// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! REST endpoints for upload, query and session management
//!
//! Handlers are thin adapters over [`QaService`]: extract the request,
//! call the service, map the typed error onto a status code and a JSON
//! error body. All domain decisions live in the service layer.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::errors::{QueryError, UploadError};
use crate::resolver::AnswerSource;
use crate::search::WebSource;
use crate::service::QaService;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QaService>,
}

/// Build the application router
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/upload", post(upload_pdf))
        .route("/api/v1/query", post(query))
        .route(
            "/api/v1/session/:session_id",
            get(session_status).delete(clear_session),
        )
        // Slack over the validator limit so oversize uploads reach our own
        // 413 body instead of a bare framework rejection
        .layer(DefaultBodyLimit::max(max_upload_bytes + 1024 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    error_code: String,
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
            error_code: code.to_string(),
        }),
    )
        .into_response()
}

fn upload_error_response(err: UploadError) -> Response {
    let status = match &err {
        UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        UploadError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
        UploadError::Indexing(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(code = err.error_code(), error = %err, "Upload failed");
    error_response(status, err.error_code(), err.user_message())
}

fn query_error_response(err: QueryError) -> Response {
    let status = match &err {
        QueryError::SessionNotFound | QueryError::NoDocument => StatusCode::NOT_FOUND,
        QueryError::Resolution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(code = err.error_code(), error = %err, "Query failed");
    error_response(status, err.error_code(), err.user_message())
}

/// Seconds elapsed, rounded to two decimals for response bodies
fn elapsed_secs(start: Instant) -> f64 {
    (start.elapsed().as_secs_f64() * 100.0).round() / 100.0
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "pdf-rag-node",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/v1/upload",
            "query": "POST /api/v1/query",
            "session": "GET|DELETE /api/v1/session/{session_id}",
            "health": "GET /health",
        },
    }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "active_sessions": state.service.store().count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    success: bool,
    session_id: String,
    filename: String,
    chunk_count: usize,
    message: String,
    processing_time: f64,
}

async fn upload_pdf(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let start = Instant::now();

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut session_id: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "INVALID_REQUEST",
                    format!("Malformed multipart body: {}", e),
                );
            }
        };

        match field.name() {
            Some("file") => {
                filename = field.file_name().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => file_bytes = Some(bytes.to_vec()),
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            "INVALID_REQUEST",
                            format!("Failed to read file field: {}", e),
                        );
                    }
                }
            }
            Some("session_id") => {
                if let Ok(value) = field.text().await {
                    if !value.is_empty() {
                        session_id = Some(value);
                    }
                }
            }
            _ => {}
        }
    }

    let Some(bytes) = file_bytes else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_REQUEST",
            "Missing 'file' field in multipart body".to_string(),
        );
    };
    let filename = filename.unwrap_or_else(|| "document.pdf".to_string());

    match state
        .service
        .upload(bytes, &filename, session_id.as_deref())
        .await
    {
        Ok(outcome) => {
            info!(
                session_id = %outcome.session_id,
                chunks = outcome.chunk_count,
                "Upload processed"
            );
            (
                StatusCode::OK,
                Json(UploadResponse {
                    success: true,
                    session_id: outcome.session_id,
                    filename: outcome.document_name,
                    chunk_count: outcome.chunk_count,
                    message: "PDF processed successfully".to_string(),
                    processing_time: elapsed_secs(start),
                }),
            )
                .into_response()
        }
        Err(err) => upload_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    session_id: String,
    question: String,
}

#[derive(Debug, Serialize)]
struct QueryResponse {
    success: bool,
    answer: String,
    source: AnswerSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunks_used: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_sources: Option<Vec<WebSource>>,
    processing_time: f64,
}

async fn query(State(state): State<AppState>, Json(request): Json<QueryRequest>) -> Response {
    let start = Instant::now();

    if request.question.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_REQUEST",
            "Question must not be empty".to_string(),
        );
    }

    match state
        .service
        .resolve_query(&request.session_id, &request.question)
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(QueryResponse {
                success: true,
                answer: result.answer,
                source: result.source,
                chunks_used: result.chunks_used,
                web_sources: result.web_sources,
                processing_time: elapsed_secs(start),
            }),
        )
            .into_response(),
        Err(err) => query_error_response(err),
    }
}

async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.service.get_status(&session_id).await {
        Some(status) => (StatusCode::OK, Json(status)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "SESSION_NOT_FOUND",
            "Session not found".to_string(),
        ),
    }
}

async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    if state.service.clear_session(&session_id).await {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Session cleared successfully",
            })),
        )
            .into_response()
    } else {
        error_response(
            StatusCode::NOT_FOUND,
            "SESSION_NOT_FOUND",
            "Session not found".to_string(),
        )
    }
}
