// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigurationSection;

fn default_endpoint() -> Url {
    Url::parse("https://graph.microsoft.com/").unwrap()
}

/// Configuration related to the tenant directory
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DirectoryConfig {
    /// The base URL of the directory's graph API
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// The catalog identifier of the add-in application, as the directory
    /// knows it
    pub app_id: String,

    /// Perform lookups but refuse revocations. Useful to validate a
    /// deployment without deprovisioning anyone.
    #[serde(default)]
    pub read_only: bool,
}

impl ConfigurationSection for DirectoryConfig {
    const PATH: Option<&'static str> = Some("directory");
}

impl DirectoryConfig {
    pub(crate) fn generate() -> Self {
        Self {
            endpoint: default_endpoint(),
            app_id: String::new(),
            read_only: false,
        }
    }

    pub(crate) fn test() -> Self {
        Self {
            endpoint: default_endpoint(),
            app_id: "00000000-0000-0000-0000-000000000000".to_owned(),
            read_only: false,
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
                    directory:
                      app_id: 5a902a13-8bf7-41a7-b25c-9e3a8e0a5a28
                      read_only: true
                ",
            )?;

            let config = Figment::new()
                .merge(Yaml::file("config.yaml"))
                .extract_inner::<DirectoryConfig>("directory")?;

            assert_eq!(&config.app_id, "5a902a13-8bf7-41a7-b25c-9e3a8e0a5a28");
            assert_eq!(config.endpoint.as_str(), "https://graph.microsoft.com/");
            assert!(config.read_only);

            Ok(())
        });
    }
}
