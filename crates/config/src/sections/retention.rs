// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigurationSection;

fn default_new_hire_period_days() -> u32 {
    30
}

/// Configuration of the retention policy applied to onboarding-tracked
/// accounts. This section is re-read on every sweep cycle, so edits to it
/// apply without a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RetentionConfig {
    /// Number of days after which a new hire record and its app access are
    /// purged. A record installed exactly this many days ago is kept.
    #[serde(default = "default_new_hire_period_days")]
    pub new_hire_period_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            new_hire_period_days: default_new_hire_period_days(),
        }
    }
}

impl ConfigurationSection for RetentionConfig {
    const PATH: Option<&'static str> = Some("retention");
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
                    retention:
                      new_hire_period_days: 45
                ",
            )?;

            let config = Figment::new()
                .merge(Yaml::file("config.yaml"))
                .extract_inner::<RetentionConfig>("retention")?;

            assert_eq!(config.new_hire_period_days, 45);

            Ok(())
        });
    }

    #[test]
    fn defaults() {
        let config = RetentionConfig::default();
        assert_eq!(config.new_hire_period_days, 30);
    }
}
