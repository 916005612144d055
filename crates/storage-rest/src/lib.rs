// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! A [`UserStore`] backend over the add-in backend's REST surface

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenure_data_model::{Ulid, UserRecord, UserRole};
use tenure_http::RequestBuilderExt;
use tenure_storage::UserStore;
use url::Url;

use crate::error::StoreResponseExt as _;

mod error;

/// The role slug the backend uses in its query parameters and row payloads
fn role_slug(role: UserRole) -> &'static str {
    match role {
        UserRole::NewHire => "new_hire",
        UserRole::Member => "member",
    }
}

/// One row as the backend serializes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRow {
    id: Ulid,
    directory_id: String,
    role: UserRole,
    installed_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            directory_id: row.directory_id,
            role: row.role,
            installed_at: row.installed_at,
        }
    }
}

/// A [`UserStore`] reached over the add-in backend's REST API.
#[derive(Clone)]
pub struct RestUserStore {
    endpoint: Url,
    secret: String,
    http_client: reqwest::Client,
}

impl RestUserStore {
    #[must_use]
    pub fn new(endpoint: Url, secret: String, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            secret,
            http_client,
        }
    }

    fn builder(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(
                method,
                self.endpoint
                    .join(url)
                    .map(String::from)
                    .unwrap_or_default(),
            )
            .bearer_auth(&self.secret)
    }
}

#[async_trait::async_trait]
impl UserStore for RestUserStore {
    #[tracing::instrument(
        name = "store.list_users",
        skip_all,
        fields(user.role = role_slug(role)),
        err(Debug),
    )]
    async fn list_users(&self, role: UserRole) -> Result<Vec<UserRecord>, anyhow::Error> {
        let url = format!("api/users?role={}", role_slug(role));
        let response = self
            .builder(reqwest::Method::GET, &url)
            .send_traced()
            .await
            .context("Failed to query users from the store")?;

        let response = response
            .error_for_store_error()
            .await
            .context("Unexpected HTTP response while querying users from the store")?;

        let rows: Vec<UserRow> = response
            .json()
            .await
            .context("Failed to deserialize response while querying users from the store")?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    #[tracing::instrument(
        name = "store.delete_users",
        skip_all,
        fields(batch.size = records.len()),
        err(Debug),
    )]
    async fn delete_users(&self, records: &[UserRecord]) -> Result<(), anyhow::Error> {
        #[derive(Serialize)]
        struct Request {
            ids: Vec<Ulid>,
        }

        let body = Request {
            ids: records.iter().map(|record| record.id).collect(),
        };

        let response = self
            .builder(reqwest::Method::POST, "api/users/delete")
            .json(&body)
            .send_traced()
            .await
            .context("Failed to delete users from the store")?;

        response
            .error_for_store_error()
            .await
            .context("Unexpected HTTP response while deleting users from the store")?;

        Ok(())
    }
}
