// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Deterministic text chunking with overlap
//!
//! Splits page text into fixed-length character windows with a configurable
//! overlap between consecutive windows. Identical input and configuration
//! always produce identical chunk boundaries, so chunk counts are
//! reproducible across uploads of the same document.

use super::pdf::PageText;

/// A bounded span of document text with its source locator
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    /// 1-based page number the chunk came from
    pub page: u32,
    /// Character offset of the chunk within its page
    pub offset: usize,
}

/// Split a single page into overlapping chunks
///
/// `overlap` must be smaller than `chunk_size` (enforced by config
/// validation). Windows advance by `chunk_size - overlap` characters;
/// whitespace-only windows are dropped.
pub fn split_page(text: &str, page: u32, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    debug_assert!(overlap < chunk_size);

    let char_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let total_chars = char_offsets.len();
    if total_chars == 0 {
        return Vec::new();
    }

    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let end = (start + chunk_size).min(total_chars);
        let byte_start = char_offsets[start];
        let byte_end = if end == total_chars {
            text.len()
        } else {
            char_offsets[end]
        };

        let slice = &text[byte_start..byte_end];
        if !slice.trim().is_empty() {
            chunks.push(Chunk {
                text: slice.to_string(),
                page,
                offset: start,
            });
        }

        if end == total_chars {
            break;
        }
        start += step;
    }

    chunks
}

/// Split extracted pages into chunks, preserving page locators
pub fn split_pages(pages: &[PageText], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    pages
        .iter()
        .flat_map(|page| split_page(&page.text, page.number, chunk_size, overlap))
        .collect()
}
