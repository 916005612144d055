// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use crate::{AccessToken, AppInstallation, DirectoryConnection};

/// A wrapper around a [`DirectoryConnection`] that only allows read
/// operations. Useful to validate a deployment without deprovisioning
/// anyone.
pub struct ReadOnlyDirectoryConnection<C> {
    inner: C,
}

impl<C> ReadOnlyDirectoryConnection<C> {
    pub fn new(inner: C) -> Self
    where
        C: DirectoryConnection,
    {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl<C: DirectoryConnection> DirectoryConnection for ReadOnlyDirectoryConnection<C> {
    fn app_id(&self) -> &str {
        self.inner.app_id()
    }

    async fn find_installed_app(
        &self,
        token: &AccessToken,
        directory_id: &str,
    ) -> Result<Option<AppInstallation>, anyhow::Error> {
        self.inner.find_installed_app(token, directory_id).await
    }

    async fn revoke_installed_app(
        &self,
        _token: &AccessToken,
        _directory_id: &str,
        _installation: &AppInstallation,
    ) -> Result<(), anyhow::Error> {
        anyhow::bail!("App revocation is not supported in read-only mode");
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::MockDirectoryConnection;

    #[tokio::test]
    async fn lookups_pass_through_but_revocations_are_refused() {
        let inner = MockDirectoryConnection::new("app");
        inner.install_for("user-a", "inst-a");

        let readonly = ReadOnlyDirectoryConnection::new(inner);
        let token = AccessToken::new("token");

        let installation = readonly.find_installed_app(&token, "user-a").await.unwrap();
        let installation = assert_matches!(installation, Some(installation) => installation);
        assert_eq!(installation.id, "inst-a");

        let result = readonly
            .revoke_installed_app(&token, "user-a", &installation)
            .await;
        assert_matches!(result, Err(_));

        // The inner connection was never asked to revoke anything
        assert_eq!(readonly.inner.installed_for(), vec!["user-a"]);
    }
}
