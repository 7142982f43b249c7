// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Upload and indexing behavior through the service facade

use pdf_rag_node::config::AppConfig;
use pdf_rag_node::errors::UploadError;

use super::support::{file_count, harness, harness_with_config, minimal_pdf_with_text};

#[tokio::test]
async fn test_upload_indexes_document() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("The capital of France is Paris.");
    let outcome = h.service.upload(pdf, "geography.pdf", None).await.unwrap();

    assert!(!outcome.session_id.is_empty());
    assert_eq!(outcome.document_name, "geography.pdf");
    assert!(outcome.chunk_count >= 1);

    // Raw file kept as the session artifact
    assert_eq!(file_count(dir.path()), 1);
}

#[tokio::test]
async fn test_chunk_count_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("Same document, uploaded twice.");
    let first = h.service.upload(pdf.clone(), "a.pdf", None).await.unwrap();
    let second = h.service.upload(pdf, "a.pdf", None).await.unwrap();

    assert_eq!(first.chunk_count, second.chunk_count);
}

#[tokio::test]
async fn test_upload_without_session_creates_one() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("hello");
    let outcome = h.service.upload(pdf, "doc.pdf", None).await.unwrap();

    let status = h.service.get_status(&outcome.session_id).await.unwrap();
    assert!(status.has_document);
    assert_eq!(status.chunk_count, Some(outcome.chunk_count));
}

#[tokio::test]
async fn test_upload_with_unknown_session_id_gets_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("hello");
    let outcome = h
        .service
        .upload(pdf, "doc.pdf", Some("no-such-session"))
        .await
        .unwrap();

    assert_ne!(outcome.session_id, "no-such-session");
    assert!(h.service.get_status(&outcome.session_id).await.is_some());
}

#[tokio::test]
async fn test_reupload_replaces_document_and_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec!["answer"]);

    let first = h
        .service
        .upload(minimal_pdf_with_text("first document"), "first.pdf", None)
        .await
        .unwrap();

    let second = h
        .service
        .upload(
            minimal_pdf_with_text("second document"),
            "second.pdf",
            Some(&first.session_id),
        )
        .await
        .unwrap();

    // Same session, new document, old artifact deleted
    assert_eq!(second.session_id, first.session_id);
    let status = h.service.get_status(&first.session_id).await.unwrap();
    assert_eq!(status.document_name.as_deref(), Some("second.pdf"));
    assert_eq!(file_count(dir.path()), 1);
    assert_eq!(h.store.count().await, 1);

    // Queries now see only the second document's content
    h.service
        .resolve_query(&first.session_id, "what does it say?")
        .await
        .unwrap();
    let prompts = h.model.prompts();
    assert!(prompts[0].contains("second document"));
    assert!(!prompts[0].contains("first document"));
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        upload_dir: dir.path().to_path_buf(),
        max_file_size_mb: 1,
        ..AppConfig::default()
    };
    let h = harness_with_config(config, vec![]);

    let mut bytes = minimal_pdf_with_text("padded");
    bytes.resize(2 * 1024 * 1024, b' ');

    let err = h.service.upload(bytes, "big.pdf", None).await.unwrap_err();
    assert!(matches!(err, UploadError::TooLarge { .. }));
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_pdf_extension_with_wrong_signature_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let err = h
        .service
        .upload(b"<html>not a pdf</html>".to_vec(), "fake.pdf", None)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::InvalidDocument(_)));
}

#[tokio::test]
async fn test_non_pdf_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), vec![]);

    let pdf = minimal_pdf_with_text("valid content, wrong name");
    let err = h.service.upload(pdf, "notes.docx", None).await.unwrap_err();
    assert!(matches!(err, UploadError::InvalidDocument(_)));
}
