// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! In-memory session registry
//!
//! Sessions own their document index and on-disk artifact exclusively;
//! both are released on clear, replacement, or reaper eviction.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::vector::VectorIndex;

/// Store-level failure: the addressed session does not exist
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found")]
    NotFound,
}

/// State held for each session
#[derive(Debug, Clone)]
struct Session {
    id: String,
    index: Option<Arc<VectorIndex>>,
    document_name: Option<String>,
    chunk_count: Option<usize>,
    artifact_path: Option<PathBuf>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Session {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            index: None,
            document_name: None,
            chunk_count: None,
            artifact_path: None,
            created_at: now,
            last_active: now,
        }
    }
}

/// Point-in-time view of a session, safe to use outside the store lock
///
/// Carries a cloned handle to the index so queries against one session
/// never hold the store lock while searching.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub document_name: Option<String>,
    pub chunk_count: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub index: Option<Arc<VectorIndex>>,
}

impl SessionSnapshot {
    pub fn has_document(&self) -> bool {
        self.index.is_some()
    }
}

/// In-memory registry of sessions keyed by opaque id
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new empty session and return its id
    pub async fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), Session::new(id.clone()));
        info!(session_id = %id, "Created new session");
        id
    }

    /// Look up a session, bumping last_active on hit
    ///
    /// Read access counts as activity; absence is not an error here, the
    /// caller decides how to react.
    pub async fn get(&self, session_id: &str) -> Option<SessionSnapshot> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;
        session.last_active = Utc::now();
        Some(snapshot_of(session))
    }

    /// Whether a session with this id exists (does not bump last_active)
    pub async fn exists(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Number of live sessions
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Attach a freshly built index to an existing session
    ///
    /// Replaces (and releases) any previously held index; the prior on-disk
    /// artifact is deleted so a re-upload never leaks files. Bumps
    /// last_active.
    pub async fn attach_index(
        &self,
        session_id: &str,
        index: Arc<VectorIndex>,
        document_name: String,
        chunk_count: usize,
        artifact_path: Option<PathBuf>,
    ) -> Result<(), StoreError> {
        let old_artifact;
        {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(session_id).ok_or(StoreError::NotFound)?;

            // Dropping the old Arc here is the release; the index itself is
            // freed once any in-flight query finishes with its clone.
            old_artifact = session.artifact_path.take();
            session.index = Some(index);
            session.document_name = Some(document_name);
            session.chunk_count = Some(chunk_count);
            session.artifact_path = artifact_path;
            session.last_active = Utc::now();
        }

        if let Some(path) = old_artifact {
            remove_artifacts(vec![path]).await;
        }

        debug!(session_id = %session_id, "Attached document index");
        Ok(())
    }

    /// Remove a session, releasing its index and deleting its artifact
    ///
    /// Returns false if the id is unknown. Artifact deletion failure is
    /// logged, not propagated; the session itself is always removed.
    pub async fn clear(&self, session_id: &str) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id)
        };

        match removed {
            Some(session) => {
                if let Some(path) = session.artifact_path {
                    remove_artifacts(vec![path]).await;
                }
                info!(session_id = %session_id, "Cleared session");
                true
            }
            None => false,
        }
    }

    /// Evict every session idle strictly longer than `idle_timeout`
    ///
    /// Uses the same release path as [`clear`]. Returns the eviction count.
    pub async fn sweep(&self, idle_timeout: Duration) -> usize {
        let cutoff =
            chrono::Duration::from_std(idle_timeout).unwrap_or(chrono::Duration::MAX);
        let now = Utc::now();

        let mut artifacts = Vec::new();
        let evicted;
        {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|id, session| {
                let keep = now.signed_duration_since(session.last_active) <= cutoff;
                if !keep {
                    debug!(session_id = %id, "Evicting idle session");
                    if let Some(path) = session.artifact_path.take() {
                        artifacts.push(path);
                    }
                }
                keep
            });
            evicted = before - sessions.len();
        }

        remove_artifacts(artifacts).await;
        evicted
    }

    /// Drop every session, releasing indexes and artifacts (teardown path)
    pub async fn release_all(&self) -> usize {
        let drained: Vec<Session> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, s)| s).collect()
        };

        let count = drained.len();
        let artifacts: Vec<PathBuf> = drained.into_iter().filter_map(|s| s.artifact_path).collect();
        remove_artifacts(artifacts).await;
        count
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_of(session: &Session) -> SessionSnapshot {
    SessionSnapshot {
        session_id: session.id.clone(),
        document_name: session.document_name.clone(),
        chunk_count: session.chunk_count,
        created_at: session.created_at,
        last_active: session.last_active,
        index: session.index.clone(),
    }
}

/// Best-effort artifact deletion, outside any store lock
async fn remove_artifacts(paths: Vec<PathBuf>) {
    for path in paths {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Deleted artifact"),
            Err(e) => {
                // Artifact may already be gone; session removal still succeeds
                warn!(path = %path.display(), error = %e, "Failed to delete artifact");
            }
        }
    }
}
