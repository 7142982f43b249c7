// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! PDF text extraction
//!
//! Extracts per-page text from PDF bytes using lopdf. Text-show operands
//! (string literals in the page content streams) are collected directly,
//! which covers the uncompressed and Flate-compressed streams lopdf can
//! decode. Pages that fail to parse are skipped with a warning rather than
//! failing the whole document.

use tracing::{debug, warn};

use crate::errors::UploadError;

/// Canonical signature bytes every PDF starts with
pub const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Text extracted from a single page
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-based page number
    pub number: u32,
    pub text: String,
}

/// Extract text from every page of a PDF
///
/// Fails with `InvalidDocument` if the structure is unreadable or no page
/// yields any text.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<PageText>, UploadError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| UploadError::InvalidDocument(format!("Failed to parse PDF: {}", e)))?;

    let page_ids: Vec<_> = doc.page_iter().collect();
    debug!(page_count = page_ids.len(), "Extracting text from PDF");

    let mut pages = Vec::with_capacity(page_ids.len());
    for (i, page_id) in page_ids.into_iter().enumerate() {
        let number = (i + 1) as u32;
        match doc.get_page_content(page_id) {
            Ok(content) => {
                let text = clean_text(&extract_text_from_content(&content));
                if !text.is_empty() {
                    pages.push(PageText { number, text });
                }
            }
            Err(e) => {
                warn!(page = number, error = %e, "Failed to read page content, skipping");
            }
        }
    }

    if pages.is_empty() {
        return Err(UploadError::InvalidDocument(
            "No text content extracted from PDF".to_string(),
        ));
    }

    Ok(pages)
}

/// Collect string literals from a page content stream
///
/// PDF content streams show text via `(...) Tj`, `[...] TJ`, `'` and `"`
/// operators; the string literals are the operands. Nested parentheses and
/// backslash escapes are handled per the PDF string grammar.
fn extract_text_from_content(content: &[u8]) -> String {
    let stream = String::from_utf8_lossy(content);
    let mut out = String::new();
    let mut chars = stream.chars();
    let mut current = String::new();
    let mut in_string = false;
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        if !in_string {
            if c == '(' {
                in_string = true;
                depth = 0;
            }
            continue;
        }

        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(decode_escape(escaped));
                }
            }
            '(' => {
                depth += 1;
                current.push('(');
            }
            ')' => {
                if depth == 0 {
                    in_string = false;
                    out.push_str(&current);
                    out.push(' ');
                    current.clear();
                } else {
                    depth -= 1;
                    current.push(')');
                }
            }
            _ => current.push(c),
        }
    }

    out
}

fn decode_escape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    }
}

/// Normalize whitespace in extracted text
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
