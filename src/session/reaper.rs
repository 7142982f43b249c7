// Copyright (c) 2025 pdf-rag-node
// SPDX-License-Identifier: MIT
//! Background eviction of idle sessions
//!
//! A single task sweeps the store on a fixed interval. Shutdown is
//! cooperative via a cancellation token so the final sweep never races
//! the server teardown.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::store::SessionStore;

/// Handle to the periodic sweep task
pub struct SessionReaper {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SessionReaper {
    /// Spawn the reaper loop
    ///
    /// Every `interval`, evicts sessions idle longer than `idle_timeout`.
    /// The first sweep happens one full interval after spawn.
    pub fn spawn(store: Arc<SessionStore>, interval: Duration, idle_timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Consume the immediate first tick so sweeps start after one interval
            ticker.tick().await;

            info!(
                interval_secs = interval.as_secs(),
                idle_timeout_secs = idle_timeout.as_secs(),
                "Session reaper started"
            );

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("Session reaper stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let evicted = store.sweep(idle_timeout).await;
                        if evicted > 0 {
                            info!(evicted, "Reaper evicted idle sessions");
                        }
                    }
                }
            }
        });

        Self { token, handle }
    }

    /// Stop the loop and wait for it to finish
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Session reaper task did not shut down cleanly");
        }
    }
}
