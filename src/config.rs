// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the configuration file that drives easyclone, and
//! how it gets loaded. Loading happens in four stages:
//!
//! 1. Read raw text from disk.
//! 2. Substitute environment variable placeholders in raw text, see [`env`].
//! 3. Parse YAML, first into a generic document to catch syntax errors, then
//!    into the raw layout to catch type errors.
//! 4. Validate cross-field rules and apply defaults, see [`validate`].
//!
//! Nothing touches the file system beyond step 1 until all four stages
//! succeed.
//!
//! # General Layout
//!
//! ```yaml
//! root: ${WORKSPACE:-.}
//! strict: false
//! force: false
//! skip: false
//! cleanup: [".git", ".github"]
//! repositories:
//!   - target: libs/oxidot
//!     url: awkless/oxidot
//!     branch: main
//!   - target: vendor/local
//!     path: ../local
//!     cleanup: ["target"]
//! ```

pub mod env;
pub mod validate;

use crate::config::{env::EnvError, validate::ValidationErrors};

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, instrument};

/// Validated configuration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Config {
    /// Settings shared by every entry.
    pub root: RootConfig,

    /// Entries in declared order.
    pub repositories: Vec<RepositoryEntry>,
}

impl Config {
    /// Load configuration file from disk.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Missing`] if file cannot be read.
    /// - Return any other [`ConfigError`] from parsing, see [`Config::from_str`].
    #[instrument(skip(path), level = "debug")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        debug!("load configuration from {:?}", path.as_ref().display());
        let data = read_to_string(path.as_ref()).map_err(|source| ConfigError::Missing {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        data.parse()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let data = env::substitute(data)?;
        let document: serde_yaml::Value =
            serde_yaml::from_str(&data).map_err(ConfigError::Parse)?;
        let raw = serde_yaml::from_value(document).map_err(ConfigError::Schema)?;

        Ok(validate::validate(raw)?)
    }
}

/// Settings shared by every entry.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RootConfig {
    /// Base directory that all targets are resolved against.
    pub root: PathBuf,

    /// Remove targets of disabled entries.
    pub strict: bool,

    /// Never ask for confirmation before destroying a target.
    pub force: bool,

    /// Leave existing targets of enabled entries untouched.
    pub skip: bool,

    /// Paths removed from every target after materialization.
    pub cleanup: Vec<String>,
}

/// Single target to source mapping.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RepositoryEntry {
    /// Destination relative to root directory.
    pub target: PathBuf,

    /// Where content comes from.
    pub source: Source,

    /// Whether entry is active.
    pub enable: bool,

    /// Extra paths removed from target after root-level cleanup.
    pub cleanup: Vec<String>,
}

/// Where the content of an entry comes from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Source {
    /// Directory on local file system to copy.
    Local { path: PathBuf },

    /// Remote repository to shallow fetch.
    Remote { url: String, revision: Revision },
}

/// Revision of remote repository to materialize.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub enum Revision {
    /// Tip of remote's default branch.
    #[default]
    Default,

    /// Tip of named branch.
    Branch(String),

    /// Exact commit.
    Hash(String),
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file cannot be read.
    #[error("failed to read configuration file at {:?}", path.display())]
    Missing {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Configuration file is not valid YAML.
    #[error("invalid YAML")]
    Parse(#[source] serde_yaml::Error),

    /// Configuration file does not match expected layout.
    #[error("invalid configuration layout: {0}")]
    Schema(#[source] serde_yaml::Error),

    /// Environment variable substitution failed.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Cross-field rules are violated.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
