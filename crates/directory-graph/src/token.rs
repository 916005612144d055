// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! Application token acquisition through the [Client Credentials flow].
//!
//! [Client Credentials flow]: https://www.rfc-editor.org/rfc/rfc6749#section-4.4

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tenure_directory::{AccessToken, TokenService};
use tenure_http::RequestBuilderExt;
use url::Url;

/// A [`TokenService`] which exchanges the application's client credentials
/// for a tenant-scoped access token on each request.
#[derive(Clone)]
pub struct ClientCredentialsTokenService {
    token_endpoint: Url,
    client_id: String,
    client_secret: String,
    scope: String,
    http_client: reqwest::Client,
}

impl ClientCredentialsTokenService {
    #[must_use]
    pub fn new(
        token_endpoint: Url,
        client_id: String,
        client_secret: String,
        scope: String,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            token_endpoint,
            client_id,
            client_secret,
            scope,
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl TokenService for ClientCredentialsTokenService {
    #[tracing::instrument(
        name = "token.obtain_app_token",
        skip_all,
        fields(oauth2.client_id = self.client_id),
        err(Debug),
    )]
    async fn obtain_app_token(&self) -> Result<Option<AccessToken>, anyhow::Error> {
        #[derive(Serialize)]
        struct Request<'a> {
            grant_type: &'a str,
            client_id: &'a str,
            client_secret: &'a str,
            scope: &'a str,
        }

        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct Response {
            access_token: String,
            token_type: Option<String>,
            expires_in: Option<u64>,
        }

        tracing::debug!("Requesting access token with client credentials...");

        let response = self
            .http_client
            .post(self.token_endpoint.clone())
            .form(&Request {
                grant_type: "client_credentials",
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                scope: &self.scope,
            })
            .send_traced()
            .await
            .context("Failed to reach the token endpoint")?;

        let response = response
            .error_for_status()
            .context("Token endpoint refused the client credentials grant")?;

        let body: Response = response
            .json()
            .await
            .context("Failed to deserialize the token endpoint response")?;

        if body.access_token.is_empty() {
            return Ok(None);
        }

        Ok(Some(AccessToken::new(body.access_token)))
    }
}
