// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use anyhow::Context as _;
use serde::Deserialize;
use tenure_directory::{AccessToken, AppInstallation, DirectoryConnection};
use tenure_http::RequestBuilderExt;
use tracing::debug;
use url::Url;

use crate::error::{GraphResponseExt as _, ITEM_NOT_FOUND};

mod error;
mod token;

pub use self::token::ClientCredentialsTokenService;

/// A [`DirectoryConnection`] over the tenant directory's graph API.
#[derive(Clone)]
pub struct GraphConnection {
    endpoint: Url,
    app_id: String,
    http_client: reqwest::Client,
}

impl GraphConnection {
    #[must_use]
    pub fn new(endpoint: Url, app_id: String, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            app_id,
            http_client,
        }
    }

    fn builder(&self, method: reqwest::Method, url: &str, token: &AccessToken) -> reqwest::RequestBuilder {
        self.http_client
            .request(
                method,
                self.endpoint
                    .join(url)
                    .map(String::from)
                    .unwrap_or_default(),
            )
            .bearer_auth(token.as_str())
    }
}

#[async_trait::async_trait]
impl DirectoryConnection for GraphConnection {
    fn app_id(&self) -> &str {
        &self.app_id
    }

    #[tracing::instrument(
        name = "directory.find_installed_app",
        skip_all,
        fields(
            directory.user_id = directory_id,
            directory.app_id = self.app_id,
        ),
        err(Debug),
    )]
    async fn find_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
    ) -> Result<Option<AppInstallation>, anyhow::Error> {
        #[derive(Deserialize)]
        struct Response {
            value: Vec<Installation>,
        }

        #[derive(Deserialize)]
        struct Installation {
            id: String,
        }

        let encoded_user = urlencoding::encode(directory_id);
        let filter = format!("teamsApp/externalId eq '{}'", self.app_id);
        let url = format!(
            "v1.0/users/{encoded_user}/teamwork/installedApps?$expand=teamsApp&$filter={}",
            urlencoding::encode(&filter),
        );

        let response = self
            .builder(reqwest::Method::GET, &url, token)
            .send_traced()
            .await
            .context("Failed to query installed apps from the directory")?;

        let response = match response.error_for_graph_error().await {
            Ok(response) => response,

            // The user is gone from the directory, so nothing is installed
            Err(err) if err.code() == Some(ITEM_NOT_FOUND) => {
                debug!(
                    error = &err as &dyn std::error::Error,
                    "User not found in the directory"
                );
                return Ok(None);
            }

            Err(err) => {
                return Err(err)
                    .context("Unexpected HTTP response while querying installed apps");
            }
        };

        let body: Response = response
            .json()
            .await
            .context("Failed to deserialize response while querying installed apps")?;

        Ok(body
            .value
            .into_iter()
            .next()
            .map(|installation| AppInstallation {
                id: installation.id,
            }))
    }

    #[tracing::instrument(
        name = "directory.revoke_installed_app",
        skip_all,
        fields(
            directory.user_id = directory_id,
            directory.installation_id = installation.id,
        ),
        err(Debug),
    )]
    async fn revoke_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
        installation: &AppInstallation,
    ) -> Result<(), anyhow::Error> {
        let encoded_user = urlencoding::encode(directory_id);
        let encoded_installation = urlencoding::encode(&installation.id);
        let url = format!("v1.0/users/{encoded_user}/teamwork/installedApps/{encoded_installation}");

        let response = self
            .builder(reqwest::Method::DELETE, &url, token)
            .send_traced()
            .await
            .context("Failed to remove the app from the user's scope")?;

        match response.error_for_graph_error().await {
            Ok(_response) => Ok(()),

            // Someone removed it before us, which is what we wanted anyway
            Err(err) if err.code() == Some(ITEM_NOT_FOUND) => {
                debug!(
                    error = &err as &dyn std::error::Error,
                    "Installation was already removed"
                );
                Ok(())
            }

            Err(err) => {
                Err(err).context("Unexpected HTTP response while removing the app")
            }
        }
    }
}
