// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod auth;
mod directory;
mod retention;
mod store;

pub use self::{
    auth::AuthConfig, directory::DirectoryConfig, retention::RetentionConfig, store::StoreConfig,
};
use crate::util::ConfigurationSection;

/// Application configuration root
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RootConfig {
    /// Configuration related to the add-in backend's user store
    pub store: StoreConfig,

    /// Configuration related to the tenant directory
    pub directory: DirectoryConfig,

    /// Application credentials used against the directory
    pub auth: AuthConfig,

    /// Retention policy applied to onboarding-tracked accounts
    #[serde(default)]
    pub retention: RetentionConfig,
}

impl ConfigurationSection for RootConfig {
    fn validate(
        &self,
        figment: &figment::Figment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        self.store.validate(figment)?;
        self.directory.validate(figment)?;
        self.auth.validate(figment)?;
        self.retention.validate(figment)?;

        Ok(())
    }
}

impl RootConfig {
    /// Generate a new configuration with random secrets
    pub fn generate<R>(mut rng: R) -> Self
    where
        R: Rng + Send,
    {
        Self {
            store: StoreConfig::generate(&mut rng),
            directory: DirectoryConfig::generate(),
            auth: AuthConfig::generate(&mut rng),
            retention: RetentionConfig::default(),
        }
    }

    /// Configuration used in tests
    #[must_use]
    pub fn test() -> Self {
        Self {
            store: StoreConfig::test(),
            directory: DirectoryConfig::test(),
            auth: AuthConfig::test(),
            retention: RetentionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::{
        Figment, Jail,
        providers::{Format, Yaml},
    };

    use super::*;

    #[test]
    fn load_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    store:
                      secret: store-secret
                    directory:
                      app_id: 5a902a13-8bf7-41a7-b25c-9e3a8e0a5a28
                    auth:
                      tenant_id: 11111111-2222-3333-4444-555555555555
                      client_id: 66666666-7777-8888-9999-000000000000
                      client_secret: auth-secret
                ",
            )?;

            let figment = Figment::new().merge(Yaml::file("config.yaml"));
            let config = RootConfig::extract(&figment).map_err(|e| e.to_string())?;

            assert_eq!(&config.store.secret, "store-secret");
            assert_eq!(config.retention.new_hire_period_days, 30);

            Ok(())
        });
    }
}
