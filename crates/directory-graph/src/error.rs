// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::fmt::Display;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Returned by the graph when the addressed resource does not exist, which
/// includes installations that were already removed.
pub(crate) const ITEM_NOT_FOUND: &str = "NotFound";

/// The error object the graph wraps its error responses in
#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetail {
    code: String,
    message: String,
}

/// Represents an error received from the directory graph.
/// Where possible, we capture the graph's error object from the JSON
/// response body.
#[derive(Debug, Error)]
pub(crate) struct Error {
    graph_error: Option<GraphErrorBody>,

    #[source]
    source: reqwest::Error,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(body) = &self.graph_error {
            write!(f, "{}: {}", body.error.code, body.error.message)
        } else {
            write!(f, "(no specific error)")
        }
    }
}

impl Error {
    /// Return the graph error code, if the body carried one
    pub fn code(&self) -> Option<&str> {
        let body = self.graph_error.as_ref()?;
        Some(&body.error.code)
    }
}

/// An extension trait for [`reqwest::Response`] to help working with errors
/// from the graph.
#[async_trait]
pub(crate) trait GraphResponseExt: Sized {
    async fn error_for_graph_error(self) -> Result<Self, Error>;
}

#[async_trait]
impl GraphResponseExt for reqwest::Response {
    async fn error_for_graph_error(self) -> Result<Self, Error> {
        match self.error_for_status_ref() {
            Ok(_response) => Ok(self),
            Err(source) => {
                let graph_error = self.json().await.ok();
                Err(Error {
                    graph_error,
                    source,
                })
            }
        }
    }
}
