// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Source materialization.
//!
//! Materialization puts the content of an entry's source into its target
//! directory. There are three modes, picked by what the entry declares:
//!
//! | Entry declares    | Mode                                             |
//! |-------------------|--------------------------------------------------|
//! | `path`            | recursive copy of local directory                |
//! | `url` + `hash`    | init, add remote, shallow fetch commit, checkout |
//! | `url` (+ `branch`)| shallow single-branch clone                      |
//!
//! Materialization assumes the target is absent or disposable. Removing what
//! was there before is the caller's job, see [`crate::reconcile`].
//!
//! # Failure Policy
//!
//! Git exiting with non-zero status is not treated as an error. It is logged
//! along with whatever git wrote to standard error, and reported back as
//! [`Fetch::Failed`], so the run can move on to the next entry. Failing to
//! spawn git at all, or failing to copy local files, is an error.

pub mod copy;
pub mod git;

use crate::{
    config::{Revision, Source},
    source::git::{GitBin, GitCall, GitRunner},
};

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Outcome of a materialization that did not hit a hard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    /// Target now holds the source's content.
    Complete,

    /// Git reported failure. Target may be missing or partially populated.
    Failed { step: GitCall, stderr: String },
}

/// Put source content into target directories.
#[derive(Debug, Default)]
pub struct Materializer<G = GitBin>
where
    G: GitRunner,
{
    git: G,
}

impl<G> Materializer<G>
where
    G: GitRunner,
{
    /// Construct new materializer on top of git runner.
    pub fn new(git: G) -> Self {
        Self { git }
    }

    /// Access underlying git runner.
    pub fn git(&self) -> &G {
        &self.git
    }

    /// Materialize source into target.
    ///
    /// # Errors
    ///
    /// - Return [`MaterializeError::Copy`] if local copy fails.
    /// - Return [`MaterializeError::Spawn`] if git cannot be spawned.
    /// - Return [`MaterializeError::CreateTarget`] if target cannot be
    ///   created for a commit-pinned fetch.
    #[instrument(skip(self, source, target), level = "debug")]
    pub fn materialize(&mut self, source: &Source, target: &Path) -> Result<Fetch> {
        match source {
            Source::Local { path } => {
                info!("copying {:?} into {:?}", path.display(), target.display());
                copy::copy_dir(path, target)?;
                Ok(Fetch::Complete)
            }
            Source::Remote {
                url,
                revision: Revision::Hash(hash),
            } => {
                info!("fetching {url} at {hash} into {:?}", target.display());
                mkdirp::mkdirp(target).map_err(|source| MaterializeError::CreateTarget {
                    source,
                    path: target.to_path_buf(),
                })?;
                self.run_sequence(GitCall::pinned_fetch(url, hash, target))
            }
            Source::Remote { url, revision } => {
                let branch = match revision {
                    Revision::Branch(branch) => Some(branch.as_str()),
                    _ => None,
                };
                match branch {
                    Some(branch) => {
                        info!("cloning {url} branch {branch} into {:?}", target.display());
                    }
                    None => {
                        info!("cloning {url} into {:?}", target.display());
                    }
                }
                self.run_sequence([GitCall::clone_branch(url, branch, target)])
            }
        }
    }

    // INVARIANT: Stop at first failing step, later steps depend on it.
    fn run_sequence(&mut self, calls: impl IntoIterator<Item = GitCall>) -> Result<Fetch> {
        for call in calls {
            let output = self
                .git
                .run(&call)
                .map_err(|source| MaterializeError::Spawn {
                    source,
                    subcommand: call.subcommand(),
                })?;

            if !output.success {
                warn!("git {} failed:\n{}", call.subcommand(), output.stderr);
                return Ok(Fetch::Failed {
                    step: call,
                    stderr: output.stderr,
                });
            }
        }

        Ok(Fetch::Complete)
    }
}

/// Materialization error types.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// Local directory copy fails.
    #[error(transparent)]
    Copy(#[from] copy::CopyError),

    /// Target directory cannot be created.
    #[error("failed to create target directory at {:?}", path.display())]
    CreateTarget {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Git binary cannot be spawned.
    #[error("failed to spawn git {subcommand}")]
    Spawn {
        #[source]
        source: std::io::Error,
        subcommand: String,
    },
}

/// Friendly result alias :3
pub type Result<T, E = MaterializeError> = std::result::Result<T, E>;
