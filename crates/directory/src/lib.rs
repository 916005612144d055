// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

mod mock;
mod readonly;

use std::sync::Arc;

pub use self::{
    mock::{DirectoryCall, MockDirectoryConnection, StaticTokenService},
    readonly::ReadOnlyDirectoryConnection,
};

/// An application-level credential for the tenant directory, scoped to the
/// lifetime of one sweep. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for use in an `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Manual implementation so the token itself never ends up in logs
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// An installation of the add-in application in a user's personal scope, as
/// known by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInstallation {
    /// The directory's identifier for this installation. This is what the
    /// removal call needs, not the application's catalog id.
    pub id: String,
}

/// A service handing out application-level access tokens for the directory.
#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    /// Obtain an access token scoped to the host tenant.
    ///
    /// Returns [`None`] when the token service answered but did not hand out
    /// a usable token; callers should treat that the same as a failed cycle
    /// and try again later.
    ///
    /// # Errors
    ///
    /// Returns an error if the token service is unreachable.
    async fn obtain_app_token(&self) -> Result<Option<AccessToken>, anyhow::Error>;
}

#[async_trait::async_trait]
impl<T: TokenService + Send + Sync + ?Sized> TokenService for &T {
    async fn obtain_app_token(&self) -> Result<Option<AccessToken>, anyhow::Error> {
        (**self).obtain_app_token().await
    }
}

#[async_trait::async_trait]
impl<T: TokenService + ?Sized> TokenService for Arc<T> {
    async fn obtain_app_token(&self) -> Result<Option<AccessToken>, anyhow::Error> {
        (**self).obtain_app_token().await
    }
}

/// A connection to the tenant directory, scoped to one add-in application.
#[async_trait::async_trait]
pub trait DirectoryConnection: Send + Sync {
    /// The catalog identifier of the application this connection manages.
    fn app_id(&self) -> &str;

    /// Find the installation of the application in the given user's scope.
    ///
    /// Returns [`None`] if the application is not installed for that user,
    /// which callers should treat as "nothing left to revoke".
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is unreachable or the lookup was
    /// rejected.
    async fn find_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
    ) -> Result<Option<AppInstallation>, anyhow::Error>;

    /// Remove the given installation from the user's scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is unreachable or refused the
    /// removal.
    async fn revoke_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
        installation: &AppInstallation,
    ) -> Result<(), anyhow::Error>;
}

#[async_trait::async_trait]
impl<C: DirectoryConnection + Send + Sync + ?Sized> DirectoryConnection for &C {
    fn app_id(&self) -> &str {
        (**self).app_id()
    }

    async fn find_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
    ) -> Result<Option<AppInstallation>, anyhow::Error> {
        (**self).find_installed_app(token, directory_id).await
    }

    async fn revoke_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
        installation: &AppInstallation,
    ) -> Result<(), anyhow::Error> {
        (**self)
            .revoke_installed_app(token, directory_id, installation)
            .await
    }
}

#[async_trait::async_trait]
impl<C: DirectoryConnection + ?Sized> DirectoryConnection for Arc<C> {
    fn app_id(&self) -> &str {
        (**self).app_id()
    }

    async fn find_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
    ) -> Result<Option<AppInstallation>, anyhow::Error> {
        (**self).find_installed_app(token, directory_id).await
    }

    async fn revoke_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
        installation: &AppInstallation,
    ) -> Result<(), anyhow::Error> {
        (**self)
            .revoke_installed_app(token, directory_id, installation)
            .await
    }
}
