// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Query resolution: document answers and the web fallback

use pdf_rag_node::config::AppConfig;
use pdf_rag_node::errors::QueryError;
use pdf_rag_node::resolver::AnswerSource;

use super::support::{harness, harness_with_config, minimal_pdf_with_text};

#[tokio::test]
async fn test_answer_from_document() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec!["Paris is the capital of France."]);

    let pdf = minimal_pdf_with_text("The capital of France is Paris.");
    let outcome = h.service.upload(pdf, "geo.pdf", None).await.unwrap();

    let result = h
        .service
        .resolve_query(&outcome.session_id, "What is the capital of France?")
        .await
        .unwrap();

    assert_eq!(result.source, AnswerSource::Document);
    assert_eq!(result.answer, "Paris is the capital of France.");
    // Default configuration retrieves K = 3
    assert_eq!(result.chunks_used, Some(3));
    assert!(result.web_sources.is_none());
}

#[tokio::test]
async fn test_document_prompt_carries_retrieved_context() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec!["ok"]);

    let pdf = minimal_pdf_with_text("Gold melts at 1064 degrees Celsius.");
    let outcome = h.service.upload(pdf, "metals.pdf", None).await.unwrap();

    h.service
        .resolve_query(&outcome.session_id, "When does gold melt?")
        .await
        .unwrap();

    let prompts = h.model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Gold melts at 1064 degrees Celsius."));
    assert!(prompts[0].contains("When does gold melt?"));
}

#[tokio::test]
async fn test_web_fallback_on_insufficient_context() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(
        dir.path(),
        vec!["[NEED_WEB_SEARCH]", "According to the web, the answer is 42."],
    );

    let pdf = minimal_pdf_with_text("This document is about gardening.");
    let outcome = h.service.upload(pdf, "garden.pdf", None).await.unwrap();

    let result = h
        .service
        .resolve_query(&outcome.session_id, "What is the airspeed of a swallow?")
        .await
        .unwrap();

    assert_eq!(result.source, AnswerSource::Web);
    assert_eq!(result.answer, "According to the web, the answer is 42.");
    assert!(result.chunks_used.is_none());

    let sources = result.web_sources.unwrap();
    assert!(!sources.is_empty());
    // Missing fields get their defaults on the way out
    let untitled = sources.iter().find(|s| s.title == "Unknown");
    assert!(untitled.is_some());

    // Two model calls: document attempt, then web synthesis
    let prompts = h.model.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("Web Search Results"));
}

#[tokio::test]
async fn test_status_after_fallback_keeps_document_fields() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(
        dir.path(),
        vec!["[NEED_WEB_SEARCH]", "Answered from the web."],
    );

    let pdf = minimal_pdf_with_text("This document covers beekeeping.");
    let outcome = h.service.upload(pdf, "bees.pdf", None).await.unwrap();

    let result = h
        .service
        .resolve_query(&outcome.session_id, "Who won the 1998 World Cup?")
        .await
        .unwrap();
    assert_eq!(result.source, AnswerSource::Web);
    assert!(result.chunks_used.is_none());
    assert!(result.web_sources.unwrap().len() <= 3);

    // The fallback leaves the session's document state intact
    let status = h.service.get_status(&outcome.session_id).await.unwrap();
    assert!(status.has_document);
    assert_eq!(status.session_id, outcome.session_id);
    assert_eq!(status.document_name.as_deref(), Some("bees.pdf"));
    assert_eq!(status.chunk_count, Some(outcome.chunk_count));
}

#[tokio::test]
async fn test_web_sources_respect_max_results() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        upload_dir: dir.path().to_path_buf(),
        max_web_results: 2,
        ..AppConfig::default()
    };
    let h = harness_with_config(config, vec!["[NEED_WEB_SEARCH]", "web answer"]);

    let pdf = minimal_pdf_with_text("unrelated content");
    let outcome = h.service.upload(pdf, "doc.pdf", None).await.unwrap();

    let result = h
        .service
        .resolve_query(&outcome.session_id, "anything")
        .await
        .unwrap();

    assert!(result.web_sources.unwrap().len() <= 2);
}

#[tokio::test]
async fn test_query_against_unknown_session() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let err = h
        .service
        .resolve_query("missing", "anything?")
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::SessionNotFound));
}

#[tokio::test]
async fn test_query_session_with_no_document() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let id = h.store.create().await;
    let err = h.service.resolve_query(&id, "anything?").await.unwrap_err();
    assert!(matches!(err, QueryError::NoDocument));
}

#[tokio::test]
async fn test_model_failure_surfaces_as_resolution_error() {
    let dir = tempfile::tempdir().unwrap();
    // No scripted responses: the first model call fails
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("some content");
    let outcome = h.service.upload(pdf, "doc.pdf", None).await.unwrap();

    let err = h
        .service
        .resolve_query(&outcome.session_id, "anything?")
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Resolution { .. }));
}
