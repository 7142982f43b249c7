// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! HTTP API surface

pub mod http_server;

pub use http_server::{build_router, AppState};
