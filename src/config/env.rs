// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Environment variable substitution.
//!
//! Placeholders are substituted into the raw text of a configuration file
//! before it is handed to the YAML parser. Two forms are recognized:
//!
//! - `${NAME}`: replaced by the value of `NAME`, error if unset.
//! - `${NAME:-default}`: replaced by the value of `NAME`, or `default` if
//!   unset.
//!
//! A placeholder preceded by a backslash, e.g., `\${NAME}`, is kept as literal
//! text with the backslash removed. Bare `$NAME` is never touched.

use regex::{Captures, Regex};
use std::{borrow::Cow, sync::LazyLock};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\?\$\{(\w+)(?::-(.*?))?\}").expect("placeholder regex is valid")
});

/// Substitute placeholders with values from the process environment.
///
/// # Errors
///
/// - Return [`EnvError::Unset`] for the first variable that is unset and has
///   no default.
pub fn substitute(text: &str) -> Result<Cow<'_, str>> {
    substitute_with(text, |name| std::env::var(name).ok())
}

/// Substitute placeholders with values supplied by `lookup`.
///
/// # Errors
///
/// - Return [`EnvError::Unset`] for the first variable that `lookup` cannot
///   resolve and has no default.
pub fn substitute_with(
    text: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Cow<'_, str>> {
    let mut unset = None;
    let result = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let whole = &caps[0];
        if let Some(literal) = whole.strip_prefix('\\') {
            return literal.to_string();
        }

        let name = &caps[1];
        match (lookup(name), caps.get(2)) {
            (Some(value), _) => value,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                unset.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match unset {
        Some(name) => Err(EnvError::Unset { name }),
        None => Ok(result),
    }
}

/// Environment substitution error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// Referenced variable is not set and no default was provided.
    #[error("environment variable {name} is not set and no default value is provided")]
    Unset { name: String },
}

/// Friendly result alias :3
pub type Result<T, E = EnvError> = std::result::Result<T, E>;
