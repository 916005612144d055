// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::time::Duration;

use tokio::signal::unix::{Signal, SignalKind};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

/// How long a soft shutdown may take before we give up on it
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// A helper to manage graceful shutdowns.
///
/// It listens for SIGTERM and SIGINT, triggering a soft shutdown on the
/// first signal and a hard shutdown on the second one or after a timeout.
///
/// Tasks should watch the `soft_shutdown_token` to stop accepting new work
/// and finish what they started, and the `hard_shutdown_token` to drop
/// everything. Spawning through the `task_tracker` is what lets the manager
/// know when the soft shutdown is done.
pub struct ShutdownManager {
    hard_shutdown_token: CancellationToken,
    soft_shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
    sigterm: Signal,
    sigint: Signal,
}

impl ShutdownManager {
    /// Create a new shutdown manager, installing the signal handlers
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handlers could not be installed
    pub fn new() -> Result<Self, std::io::Error> {
        let hard_shutdown_token = CancellationToken::new();
        let soft_shutdown_token = hard_shutdown_token.child_token();
        let sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;
        let sigint = tokio::signal::unix::signal(SignalKind::interrupt())?;
        let task_tracker = TaskTracker::new();

        Ok(Self {
            hard_shutdown_token,
            soft_shutdown_token,
            task_tracker,
            sigterm,
            sigint,
        })
    }

    /// Get a reference to the task tracker
    #[must_use]
    pub fn task_tracker(&self) -> &TaskTracker {
        &self.task_tracker
    }

    /// Get a cancellation token triggered on soft shutdown
    #[must_use]
    pub fn soft_shutdown_token(&self) -> CancellationToken {
        self.soft_shutdown_token.clone()
    }

    /// Get a cancellation token triggered on hard shutdown
    #[must_use]
    pub fn hard_shutdown_token(&self) -> CancellationToken {
        self.hard_shutdown_token.clone()
    }

    /// Run until we finish completely shutting down.
    pub async fn run(mut self) {
        // Wait for a first signal and trigger the soft shutdown
        tokio::select! {
            _ = self.sigterm.recv() => {
                tracing::info!("Shutdown signal received (SIGTERM), shutting down");
            },
            _ = self.sigint.recv() => {
                tracing::info!("Shutdown signal received (SIGINT), shutting down");
            },
        };

        self.soft_shutdown_token.cancel();
        self.task_tracker.close();

        // Then wait for the tasks to finish, a second signal or the timeout,
        // whichever comes first
        let timeout = tokio::time::sleep(SHUTDOWN_TIMEOUT);
        tokio::select! {
            _ = self.sigterm.recv() => {
                tracing::warn!("Second shutdown signal received (SIGTERM), abort");
            },
            _ = self.sigint.recv() => {
                tracing::warn!("Second shutdown signal received (SIGINT), abort");
            },
            () = timeout => {
                tracing::warn!("Shutdown timeout reached, abort");
            },
            () = self.task_tracker.wait() => {
                // This is the happy path, we have gracefully shutdown
            },
        }

        self.hard_shutdown_token.cancel();
        self.task_tracker.wait().await;

        tracing::info!("All tasks are done, exiting");
    }
}
