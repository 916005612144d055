// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Background tasks of the retention service.
//!
//! The only task for now is the [`sweeper`]: a fixed-cadence loop which scans
//! the user store for onboarding-tracked accounts past the retention period,
//! revokes the add-in from each of them through the directory, and deletes
//! the swept records from the store.

use std::sync::Arc;

use tenure_config::RetentionWatcher;
use tenure_directory::{DirectoryConnection, TokenService};
use tenure_storage::{Clock, UserStore};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

mod sweeper;

pub use self::sweeper::SweepOutcome;

/// Everything the background tasks need to do their job
#[derive(Clone)]
pub struct State {
    store: Arc<dyn UserStore>,
    directory: Arc<dyn DirectoryConnection>,
    token_service: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
    retention: Arc<RetentionWatcher>,
}

impl State {
    /// Bundle up the collaborators of the background tasks
    pub fn new(
        store: impl UserStore + 'static,
        directory: impl DirectoryConnection + 'static,
        token_service: impl TokenService + 'static,
        clock: impl Clock + 'static,
        retention: Arc<RetentionWatcher>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            directory: Arc::new(directory),
            token_service: Arc::new(token_service),
            clock: Arc::new(clock),
            retention,
        }
    }

    fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    fn directory(&self) -> &dyn DirectoryConnection {
        self.directory.as_ref()
    }

    fn token_service(&self) -> &dyn TokenService {
        self.token_service.as_ref()
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn retention(&self) -> &RetentionWatcher {
        &self.retention
    }
}

/// Spawn the retention sweeper on the given task tracker.
///
/// The sweeper runs until the cancellation token is triggered; the sleep
/// between cycles is interrupted promptly when that happens.
pub fn init_and_run(
    state: State,
    cancellation_token: CancellationToken,
    task_tracker: &TaskTracker,
) {
    task_tracker.spawn(sweeper::run(state, cancellation_token));
}
