// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::time::Duration;

use tracing::Instrument;

static USER_AGENT: &str = concat!("tenure/", env!("CARGO_PKG_VERSION"));

/// Create a new [`reqwest::Client`] with sane parameters
///
/// # Panics
///
/// Panics if the client fails to build, which should never happen
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .expect("failed to create HTTP client")
}

async fn send_traced(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, reqwest::Error> {
    let (client, request) = request.build_split();
    let request = request?;

    let span = tracing::info_span!(
        "http.client.request",
        "http.request.method" = %request.method(),
        "url.full" = %request.url(),
        "http.response.status_code" = tracing::field::Empty,
        "rust.error" = tracing::field::Empty,
    );

    async move {
        let span = tracing::Span::current();
        match client.execute(request).await {
            Ok(response) => {
                span.record("http.response.status_code", response.status().as_u16());
                Ok(response)
            }
            Err(err) => {
                span.record("rust.error", &err as &dyn std::error::Error);
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

/// An extension trait implemented for [`reqwest::RequestBuilder`] to send a
/// request within a tracing span recording the request outcome.
pub trait RequestBuilderExt {
    /// Send the request with a tracing span around it.
    fn send_traced(self) -> impl Future<Output = Result<reqwest::Response, reqwest::Error>> + Send;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn send_traced(self) -> impl Future<Output = Result<reqwest::Response, reqwest::Error>> + Send {
        send_traced(self)
    }
}
