// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Turns the loosely typed layer that serde produces into the strongly typed
//! [`Config`]. Every cross-field rule is checked here, and every violation in
//! the file is collected, so the user sees all problems at once instead of
//! fixing them one run at a time.

use crate::{
    config::{Config, RepositoryEntry, Revision, RootConfig, Source},
    path::expand_home,
};

use regex::Regex;
use serde::Deserialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
    sync::LazyLock,
};

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+/[A-Za-z0-9_-]+$").expect("shorthand regex is valid")
});

/// Cleanup listing applied when the root does not declare one.
pub const DEFAULT_CLEANUP: [&str; 2] = [".git", ".github"];

/// Root configuration exactly as written in the file.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct RawConfig {
    pub root: Option<String>,
    pub strict: Option<bool>,
    pub force: Option<bool>,
    pub skip: Option<bool>,
    pub cleanup: Option<Vec<String>>,
    pub repositories: Vec<RawEntry>,
}

/// Repository entry exactly as written in the file.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct RawEntry {
    pub target: Option<String>,
    pub url: Option<String>,
    pub path: Option<String>,
    pub branch: Option<String>,
    pub hash: Option<String>,
    pub enable: Option<bool>,
    pub cleanup: Option<Vec<String>>,
}

/// Validate raw configuration, and apply defaults.
///
/// # Errors
///
/// - Return [`ValidationErrors`] listing every violated rule.
pub fn validate(raw: RawConfig) -> Result<Config> {
    let mut errors = Vec::new();
    let mut repositories = Vec::with_capacity(raw.repositories.len());

    for (index, entry) in raw.repositories.into_iter().enumerate() {
        match validate_entry(index, entry) {
            Ok(entry) => repositories.push(entry),
            Err(mut entry_errors) => errors.append(&mut entry_errors),
        }
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let root = RootConfig {
        root: expand_home(raw.root.as_deref().filter(|root| !root.is_empty()).unwrap_or(".")),
        strict: raw.strict.unwrap_or(false),
        force: raw.force.unwrap_or(false),
        skip: raw.skip.unwrap_or(false),
        cleanup: raw
            .cleanup
            .unwrap_or_else(|| DEFAULT_CLEANUP.iter().map(ToString::to_string).collect()),
    };

    Ok(Config { root, repositories })
}

fn validate_entry(index: usize, raw: RawEntry) -> Result<RepositoryEntry, Vec<FieldError>> {
    let target = present(raw.target);
    let url = present(raw.url);
    let path = present(raw.path);
    let branch = present(raw.branch);
    let hash = present(raw.hash);

    let context = target
        .clone()
        .or_else(|| path.clone())
        .or_else(|| url.clone());
    let error = |field, message: &str| FieldError {
        index,
        context: context.clone(),
        field,
        message: message.to_string(),
    };

    let mut errors = Vec::new();
    if target.is_none() {
        errors.push(error("target", "target is required"));
    }

    let revision = match (branch, hash) {
        (Some(_), Some(_)) => {
            errors.push(error(
                "hash",
                "either hash or branch must be provided, not both",
            ));
            Revision::Default
        }
        (Some(branch), None) => Revision::Branch(branch),
        (None, Some(hash)) => Revision::Hash(hash),
        (None, None) => Revision::Default,
    };

    let source = match (url, path) {
        (Some(_), Some(_)) => {
            errors.push(error("url", "either url or path must be provided, not both"));
            None
        }
        (None, None) => {
            errors.push(error("url", "either url or path must be provided"));
            None
        }
        (None, Some(path)) => Some(Source::Local {
            path: expand_home(&path),
        }),
        (Some(url), None) => Some(Source::Remote {
            url: normalize_url(&url),
            revision,
        }),
    };

    match (target, source) {
        (Some(target), Some(source)) if errors.is_empty() => Ok(RepositoryEntry {
            target: PathBuf::from(target),
            source,
            enable: raw.enable.unwrap_or(true),
            cleanup: raw.cleanup.unwrap_or_default(),
        }),
        _ => Err(errors),
    }
}

/// Expand `owner/repo` shorthand into a full GitHub URL.
///
/// Anything that does not look like shorthand is returned unchanged.
pub fn normalize_url(url: &str) -> String {
    if SHORTHAND.is_match(url) {
        format!("https://github.com/{url}.git")
    } else {
        url.to_string()
    }
}

// INVARIANT: Empty strings count as absent, like a missing key.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// A single violated rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Position of offending entry in `repositories`.
    pub index: usize,

    /// Target of offending entry, or its path or url if target is missing.
    pub context: Option<String>,

    /// Name of offending field.
    pub field: &'static str,

    /// What is wrong with it.
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "repositories[{}].{}: {}", self.index, self.field, self.message)?;
        if let Some(context) = &self.context {
            write!(fmt, " [{context}]")?;
        }

        Ok(())
    }
}

/// Every violated rule found in a configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Listing of violated rules.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str("invalid configuration")?;
        for error in &self.0 {
            write!(fmt, "\n  - {error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Friendly result alias :3
pub type Result<T, E = ValidationErrors> = std::result::Result<T, E>;
