// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use rand::{
    Rng,
    distributions::{Alphanumeric, DistString},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigurationSection;

fn default_endpoint() -> Url {
    Url::parse("http://localhost:3978/").unwrap()
}

/// Configuration related to the add-in backend's user store
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreConfig {
    /// The base URL of the backend's table service
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// Shared secret to use for calls to the table service
    pub secret: String,
}

impl ConfigurationSection for StoreConfig {
    const PATH: Option<&'static str> = Some("store");
}

impl StoreConfig {
    pub(crate) fn generate<R>(mut rng: R) -> Self
    where
        R: Rng + Send,
    {
        Self {
            endpoint: default_endpoint(),
            secret: Alphanumeric.sample_string(&mut rng, 32),
        }
    }

    pub(crate) fn test() -> Self {
        Self {
            endpoint: default_endpoint(),
            secret: "test".to_owned(),
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
                      endpoint: https://backend.example.com/
                      secret: test
                ",
            )?;

            let config = Figment::new()
                .merge(Yaml::file("config.yaml"))
                .extract_inner::<StoreConfig>("store")?;

            assert_eq!(config.endpoint.as_str(), "https://backend.example.com/");
            assert_eq!(&config.secret, "test");

            Ok(())
        });
    }
}
