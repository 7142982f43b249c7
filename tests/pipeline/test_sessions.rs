// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Session lifecycle through the service: status, clear, eviction

use std::time::Duration;

use pdf_rag_node::errors::QueryError;

use super::support::{file_count, harness, minimal_pdf_with_text};

#[tokio::test]
async fn test_status_reflects_uploaded_document() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("status check");
    let outcome = h.service.upload(pdf, "doc.pdf", None).await.unwrap();

    let status = h.service.get_status(&outcome.session_id).await.unwrap();
    assert_eq!(status.session_id, outcome.session_id);
    assert!(status.has_document);
    assert_eq!(status.document_name.as_deref(), Some("doc.pdf"));
    assert_eq!(status.chunk_count, Some(outcome.chunk_count));
    assert!(status.last_active >= status.created_at);
}

#[tokio::test]
async fn test_status_of_unknown_session() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);
    assert!(h.service.get_status("missing").await.is_none());
}

#[tokio::test]
async fn test_clear_removes_session_and_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("to be cleared");
    let outcome = h.service.upload(pdf, "doc.pdf", None).await.unwrap();
    assert_eq!(file_count(dir.path()), 1);

    assert!(h.service.clear_session(&outcome.session_id).await);
    assert_eq!(file_count(dir.path()), 0);
    assert!(h.service.get_status(&outcome.session_id).await.is_none());
}

#[tokio::test]
async fn test_clear_unknown_session_returns_false() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);
    assert!(!h.service.clear_session("missing").await);
}

#[tokio::test]
async fn test_query_after_clear_is_session_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("soon gone");
    let outcome = h.service.upload(pdf, "doc.pdf", None).await.unwrap();
    h.service.clear_session(&outcome.session_id).await;

    let err = h
        .service
        .resolve_query(&outcome.session_id, "still there?")
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::SessionNotFound));
}

#[tokio::test]
async fn test_sweep_evicts_idle_session_with_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("idle document");
    h.service.upload(pdf, "doc.pdf", None).await.unwrap();
    assert_eq!(file_count(dir.path()), 1);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.store.sweep(Duration::from_millis(1)).await, 1);
    assert_eq!(h.store.count().await, 0);
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_sweep_spares_recently_active_session() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("busy document");
    let outcome = h.service.upload(pdf, "doc.pdf", None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    // Status check counts as activity and resets the idle clock
    h.service.get_status(&outcome.session_id).await.unwrap();

    assert_eq!(h.store.sweep(Duration::from_millis(15)).await, 0);
    assert_eq!(h.store.count().await, 1);
}

#[tokio::test]
async fn test_independent_sessions_do_not_interfere() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let a = h
        .service
        .upload(minimal_pdf_with_text("doc a"), "a.pdf", None)
        .await
        .unwrap();
    let b = h
        .service
        .upload(minimal_pdf_with_text("doc b"), "b.pdf", None)
        .await
        .unwrap();

    assert_ne!(a.session_id, b.session_id);
    h.service.clear_session(&a.session_id).await;

    let status = h.service.get_status(&b.session_id).await.unwrap();
    assert_eq!(status.document_name.as_deref(), Some("b.pdf"));
    assert_eq!(file_count(dir.path()), 1);
}
