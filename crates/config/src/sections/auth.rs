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

fn default_authority() -> Url {
    Url::parse("https://login.microsoftonline.com/").unwrap()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_owned()
}

/// Configuration of the application credentials used against the directory
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AuthConfig {
    /// The tenant the application is installed in
    pub tenant_id: String,

    /// OAuth 2.0 client identifier of the application
    pub client_id: String,

    /// OAuth 2.0 client secret of the application
    pub client_secret: String,

    /// The authority issuing tokens for the tenant
    #[serde(default = "default_authority")]
    pub authority: Url,

    /// The scope requested for application tokens
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl AuthConfig {
    /// The token endpoint for the configured tenant
    ///
    /// # Errors
    ///
    /// Returns an error if the authority and tenant don't combine into a
    /// valid URL
    pub fn token_endpoint(&self) -> Result<Url, url::ParseError> {
        self.authority
            .join(&format!("{}/oauth2/v2.0/token", self.tenant_id))
    }
}

impl ConfigurationSection for AuthConfig {
    const PATH: Option<&'static str> = Some("auth");

    fn validate(
        &self,
        _figment: &figment::Figment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        self.token_endpoint()?;

        Ok(())
    }
}

impl AuthConfig {
    pub(crate) fn generate<R>(mut rng: R) -> Self
    where
        R: Rng + Send,
    {
        Self {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: Alphanumeric.sample_string(&mut rng, 32),
            authority: default_authority(),
            scope: default_scope(),
        }
    }

    pub(crate) fn test() -> Self {
        Self {
            tenant_id: "00000000-0000-0000-0000-000000000000".to_owned(),
            client_id: "00000000-0000-0000-0000-000000000000".to_owned(),
            client_secret: "test".to_owned(),
            authority: default_authority(),
            scope: default_scope(),
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
                    auth:
                      tenant_id: 11111111-2222-3333-4444-555555555555
                      client_id: 66666666-7777-8888-9999-000000000000
                      client_secret: test
                ",
            )?;

            let config = Figment::new()
                .merge(Yaml::file("config.yaml"))
                .extract_inner::<AuthConfig>("auth")?;

            assert_eq!(&config.tenant_id, "11111111-2222-3333-4444-555555555555");
            assert_eq!(&config.scope, "https://graph.microsoft.com/.default");

            let token_endpoint = config.token_endpoint().unwrap();
            assert_eq!(
                token_endpoint.as_str(),
                "https://login.microsoftonline.com/11111111-2222-3333-4444-555555555555/oauth2/v2.0/token"
            );

            Ok(())
        });
    }
}
