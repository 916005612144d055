// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::fmt::Display;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// The error shape the add-in backend uses for its REST surface
#[derive(Debug, Deserialize)]
struct StoreError {
    code: String,
    message: String,
}

/// Represents an error received from the user store.
/// Where possible, we capture the backend's error object from the JSON
/// response body.
#[derive(Debug, Error)]
pub(crate) struct Error {
    store_error: Option<StoreError>,

    #[source]
    source: reqwest::Error,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(store_error) = &self.store_error {
            write!(f, "{}: {}", store_error.code, store_error.message)
        } else {
            write!(f, "(no specific error)")
        }
    }
}

/// An extension trait for [`reqwest::Response`] to help working with errors
/// from the user store.
#[async_trait]
pub(crate) trait StoreResponseExt: Sized {
    async fn error_for_store_error(self) -> Result<Self, Error>;
}

#[async_trait]
impl StoreResponseExt for reqwest::Response {
    async fn error_for_store_error(self) -> Result<Self, Error> {
        match self.error_for_status_ref() {
            Ok(_response) => Ok(self),
            Err(source) => {
                let store_error = self.json().await.ok();
                Err(Error {
                    store_error,
                    source,
                })
            }
        }
    }
}
