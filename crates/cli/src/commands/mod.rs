// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

mod config;
mod worker;

#[derive(Parser, Debug)]
enum Subcommand {
    /// Configuration-related commands
    Config(self::config::Options),

    /// Run the retention worker
    Worker(self::worker::Options),
}

#[derive(Parser, Debug)]
#[command(version = crate::VERSION)]
pub struct Options {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Append,
        value_name = "FILE"
    )]
    config: Vec<Utf8PathBuf>,

    #[command(subcommand)]
    subcommand: Option<Subcommand>,
}

impl Options {
    /// Assemble the figment from the configuration files and the environment
    pub fn figment(&self) -> Figment {
        assemble_figment(&self.config_paths())
    }

    pub async fn run(mut self, figment: &Figment) -> anyhow::Result<ExitCode> {
        use Subcommand as S;

        // The worker re-assembles the figment from the same paths whenever it
        // needs a fresh view of the configuration
        let paths = self.config_paths();
        let loader = move || assemble_figment(&paths);

        match self.subcommand.take() {
            Some(S::Config(c)) => c.run(figment).await,
            Some(S::Worker(w)) => w.run(figment, loader).await,

            // Default to running the worker
            None => self::worker::Options::default().run(figment, loader).await,
        }
    }

    fn config_paths(&self) -> Vec<Utf8PathBuf> {
        if self.config.is_empty() {
            // Read the list of config files from the environment variable,
            // defaulting to `config.yaml`
            let config = std::env::var("TENURE_CONFIG").unwrap_or_else(|_| "config.yaml".to_owned());
            config.split(':').map(Utf8PathBuf::from).collect()
        } else {
            self.config.clone()
        }
    }
}

fn assemble_figment(configs: &[Utf8PathBuf]) -> Figment {
    configs
        .iter()
        .fold(Figment::new(), |figment, config| {
            figment.merge(Yaml::file(config))
        })
        .merge(Env::prefixed("TENURE_").split("_"))
}
