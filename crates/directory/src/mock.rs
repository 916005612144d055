// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::{
    collections::HashMap,
    sync::{Mutex, atomic::AtomicBool},
};

use crate::{AccessToken, AppInstallation, DirectoryConnection, TokenService};

/// One call observed by the [`MockDirectoryConnection`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    /// A lookup of the installed app for the given directory id
    FindInstalledApp(String),

    /// A removal of the given (directory id, installation id) pair
    RevokeInstalledApp(String, String),
}

/// A mock implementation of a [`DirectoryConnection`], which keeps the
/// installation state in memory and records every call made to it.
pub struct MockDirectoryConnection {
    app_id: String,
    installations: Mutex<HashMap<String, AppInstallation>>,
    calls: Mutex<Vec<DirectoryCall>>,
    fail_revocations_for: Mutex<Option<String>>,
}

impl MockDirectoryConnection {
    /// Create a new mock connection for the given application catalog id.
    #[must_use]
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            installations: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_revocations_for: Mutex::new(None),
        }
    }

    /// Record an installation of the app for the given user.
    pub fn install_for(&self, directory_id: impl Into<String>, installation_id: impl Into<String>) {
        self.installations.lock().unwrap().insert(
            directory_id.into(),
            AppInstallation {
                id: installation_id.into(),
            },
        );
    }

    /// Make revocations fail for the given user, until cleared.
    pub fn fail_revocations_for(&self, directory_id: impl Into<String>) {
        *self.fail_revocations_for.lock().unwrap() = Some(directory_id.into());
    }

    /// Let revocations succeed again.
    pub fn clear_failures(&self) {
        *self.fail_revocations_for.lock().unwrap() = None;
    }

    /// The calls made so far, in order.
    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The directory ids which still have the app installed.
    pub fn installed_for(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.installations.lock().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait::async_trait]
impl DirectoryConnection for MockDirectoryConnection {
    fn app_id(&self) -> &str {
        &self.app_id
    }

    async fn find_installed_app(
        &self,
        _token: &AccessToken,
        directory_id: &str,
    ) -> Result<Option<AppInstallation>, anyhow::Error> {
        self.calls
            .lock()
            .unwrap()
            .push(DirectoryCall::FindInstalledApp(directory_id.to_owned()));

        Ok(self
            .installations
            .lock()
            .unwrap()
            .get(directory_id)
            .cloned())
    }

    async fn revoke_installed_app(
        &self,
        _token: &AccessToken,
        directory_id: &str,
        installation: &AppInstallation,
    ) -> Result<(), anyhow::Error> {
        self.calls.lock().unwrap().push(DirectoryCall::RevokeInstalledApp(
            directory_id.to_owned(),
            installation.id.clone(),
        ));

        if self
            .fail_revocations_for
            .lock()
            .unwrap()
            .as_deref()
            .is_some_and(|id| id == directory_id)
        {
            anyhow::bail!("mock revocation failure for {directory_id}");
        }

        self.installations.lock().unwrap().remove(directory_id);
        Ok(())
    }
}

/// A [`TokenService`] handing out a fixed token, or none at all.
pub struct StaticTokenService {
    token: Option<AccessToken>,
    unreachable: AtomicBool,
}

impl StaticTokenService {
    /// A service which always hands out the given token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(AccessToken::new(token)),
            unreachable: AtomicBool::new(false),
        }
    }

    /// A service which answers but never hands out a token.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            token: None,
            unreachable: AtomicBool::new(false),
        }
    }

    /// Make the service error out, as if it were unreachable.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable
            .store(unreachable, std::sync::atomic::Ordering::Relaxed);
    }
}

#[async_trait::async_trait]
impl TokenService for StaticTokenService {
    async fn obtain_app_token(&self) -> Result<Option<AccessToken>, anyhow::Error> {
        if self.unreachable.load(std::sync::atomic::Ordering::Relaxed) {
            anyhow::bail!("mock token service unreachable");
        }

        Ok(self.token.clone())
    }
}
