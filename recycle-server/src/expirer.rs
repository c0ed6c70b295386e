// Copyright 2026 Recycle Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expirer worker for the in-memory backend.
//!
//! Marked objects carry a scheduled expiry. This worker periodically
//! removes every object whose expiry has passed, so a marked object
//! disappears without any further client request.

use recycle_core::MemoryStore;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use crate::config::ExpirerConfig;

/// Background expirer.
pub struct ExpirerWorker {
    /// Store to sweep.
    store: Arc<MemoryStore>,
    /// Worker configuration.
    config: ExpirerConfig,
}

impl ExpirerWorker {
    /// Creates a new expirer worker.
    pub fn new(store: Arc<MemoryStore>, config: ExpirerConfig) -> Self {
        Self { store, config }
    }

    /// Spawns the worker as a background task.
    ///
    /// Returns a join handle that can be used to wait for or abort the worker.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run_loop().await;
        })
    }

    /// Main worker loop.
    async fn run_loop(&self) {
        let mut timer = interval(Duration::from_secs(self.config.interval_secs));

        info!(
            "Expirer started (interval: {} seconds)",
            self.config.interval_secs
        );

        // Skip the first tick (fires immediately)
        timer.tick().await;

        loop {
            timer.tick().await;
            self.run_once().await;
        }
    }

    /// Runs a single sweep and returns the number of purged objects.
    pub async fn run_once(&self) -> usize {
        let start = std::time::Instant::now();
        let purged = self.store.purge_expired().await;
        if purged > 0 {
            info!(
                "Expirer sweep completed in {:?}, objects purged: {}",
                start.elapsed(),
                purged
            );
        } else {
            debug!("Expirer sweep found nothing to purge");
        }
        purged
    }
}
