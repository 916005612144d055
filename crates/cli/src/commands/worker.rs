// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use figment::Figment;
use tenure_config::{ConfigurationSection, RetentionWatcher, RootConfig};
use tenure_storage::SystemClock;
use tenure_tasks::State;
use tracing::{info, info_span};

use crate::{
    shutdown::ShutdownManager,
    util::{
        directory_connection_from_config, token_service_from_config, user_store_from_config,
    },
};

#[derive(Parser, Debug, Default)]
pub(super) struct Options {}

impl Options {
    pub async fn run(
        self,
        figment: &Figment,
        config_loader: impl Fn() -> Figment + Send + Sync + 'static,
    ) -> anyhow::Result<ExitCode> {
        let shutdown = ShutdownManager::new()?;
        let span = info_span!("cli.worker.init").entered();
        let config = RootConfig::extract(figment).map_err(|e| anyhow::anyhow!(e))?;

        let http_client = tenure_http::client();

        let store = user_store_from_config(&config.store, http_client.clone());
        let token_service = token_service_from_config(&config.auth, http_client.clone())?;
        let directory = directory_connection_from_config(&config.directory, http_client);

        // The watcher re-reads the configuration source on every sweep
        // cycle, so the retention period can be changed without a restart
        let retention = Arc::new(RetentionWatcher::new(config_loader).map_err(|e| anyhow::anyhow!(e))?);

        drop(config);

        let state = State::new(
            store,
            directory,
            token_service,
            SystemClock::default(),
            retention,
        );

        info!("Starting the retention sweeper");
        tenure_tasks::init_and_run(
            state,
            shutdown.soft_shutdown_token(),
            shutdown.task_tracker(),
        );
        span.exit();

        shutdown.run().await;

        Ok(ExitCode::SUCCESS)
    }
}
