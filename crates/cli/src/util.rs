// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::sync::Arc;

use anyhow::Context;
use tenure_config::{AuthConfig, DirectoryConfig, StoreConfig};
use tenure_directory::{DirectoryConnection, ReadOnlyDirectoryConnection};
use tenure_directory_graph::{ClientCredentialsTokenService, GraphConnection};
use tenure_storage_rest::RestUserStore;
use tracing::warn;

pub fn user_store_from_config(config: &StoreConfig, http_client: reqwest::Client) -> RestUserStore {
    RestUserStore::new(config.endpoint.clone(), config.secret.clone(), http_client)
}

pub fn token_service_from_config(
    config: &AuthConfig,
    http_client: reqwest::Client,
) -> Result<ClientCredentialsTokenService, anyhow::Error> {
    let token_endpoint = config
        .token_endpoint()
        .context("invalid auth configuration: could not derive the token endpoint")?;

    Ok(ClientCredentialsTokenService::new(
        token_endpoint,
        config.client_id.clone(),
        config.client_secret.clone(),
        config.scope.clone(),
        http_client,
    ))
}

pub fn directory_connection_from_config(
    config: &DirectoryConfig,
    http_client: reqwest::Client,
) -> Arc<dyn DirectoryConnection> {
    let connection = GraphConnection::new(
        config.endpoint.clone(),
        config.app_id.clone(),
        http_client,
    );

    if config.read_only {
        warn!("Directory connection is read-only, app revocations will be refused");
        Arc::new(ReadOnlyDirectoryConnection::new(connection))
    } else {
        Arc::new(connection)
    }
}
