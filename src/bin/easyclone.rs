// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use easyclone::{
    config::ConfigError,
    path::DEFAULT_CONFIG_FILE,
    reconcile::{InquireConfirm, Reconciler},
    sync, Config, GitBin,
};

use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, process::exit};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Every entry was processed.
const EXIT_SUCCESS: i32 = 0;

/// Run started, but stopped on a hard error.
const EXIT_RUN_FAILURE: i32 = 1;

/// Configuration could not be loaded, nothing was touched.
const EXIT_CONFIG_FAILURE: i32 = 2;

/// Materialize repositories declared in a configuration file.
#[derive(Debug, Clone, Parser)]
#[command(about, version, override_usage = "easyclone [options]")]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, value_name = "path", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl Cli {
    fn run(self) -> Result<()> {
        let config = Config::load(&self.config)?;
        let mut reconciler = Reconciler::new(InquireConfirm::new(), GitBin::default());
        sync(&config, &mut reconciler)?;

        Ok(())
    }
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = Cli::parse().run() {
        error!("{}", describe(&error));
        exit(exit_code(&error));
    }

    exit(EXIT_SUCCESS)
}

fn describe(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ConfigError>() {
        Some(ConfigError::Missing { path, source }) => {
            format!("cannot open configuration file {:?}: {source}", path.display())
        }
        Some(ConfigError::Parse(source)) => format!("invalid YAML: {source}"),
        Some(config) => config.to_string(),
        None => format!("{error:#}"),
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if error.is::<ConfigError>() {
        EXIT_CONFIG_FAILURE
    } else {
        EXIT_RUN_FAILURE
    }
}
