// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Session lifecycle: in-memory store plus the background reaper

pub mod reaper;
pub mod store;

pub use reaper::SessionReaper;
pub use store::{SessionSnapshot, SessionStore, StoreError};
