// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Entry reconciliation.
//!
//! Decide what to do with a single entry, given root settings and whatever
//! currently sits at its target, then do it. The target is probed fresh for
//! each entry. Only an existing directory counts as present.
//!
//! # Decision Procedure
//!
//! Rules are checked in order, and the first one that applies wins:
//!
//! 1. Disabled entry, strict root, target present: remove target. Asks for
//!    confirmation first unless forced. Declining leaves target alone.
//! 2. Enabled entry, skipping root, target present: leave target alone.
//! 3. Enabled entry: replace target. Asks for confirmation first if target
//!    is present and root is not forced. Declining leaves target alone.
//!    Otherwise, whatever is at target is removed, the source is
//!    materialized, and then root-level cleanup followed by entry-level
//!    cleanup is applied.
//! 4. Anything else: do nothing.
//!
//! # Confirmation
//!
//! Asking the user is a capability handed to the [`Reconciler`] through the
//! [`Confirm`] trait, so the procedure can run without a terminal. It is
//! never consulted when root is forced.

pub mod prompt;

use crate::{
    cleanup::{cleanup, remove_path},
    config::{RepositoryEntry, RootConfig},
    path::{is_dir_present, resolve_cleanup, resolve_target},
    source::{
        git::{GitBin, GitRunner},
        Fetch, MaterializeError, Materializer,
    },
};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

pub use prompt::InquireConfirm;

/// Ask for permission before destroying a target.
pub trait Confirm {
    /// Ask yes or no question.
    ///
    /// # Errors
    ///
    /// - Return [`ReconcileError::Prompt`] if no answer can be obtained.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> Result<bool> {
        Ok(self(message))
    }
}

/// Terminal state of a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Target of disabled entry was removed.
    Removed,

    /// Existing target was kept because root skips existing targets.
    Skipped,

    /// Source was materialized, and cleanup applied.
    Materialized,

    /// Materialization was attempted, but git reported failure. Cleanup
    /// was still applied.
    FetchFailed,

    /// Nothing to do.
    Untouched,

    /// User declined confirmation. Target was left as is.
    Aborted,
}

impl Display for Outcome {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Removed => "removed",
            Self::Skipped => "skipped",
            Self::Materialized => "materialized",
            Self::FetchFailed => "failed",
            Self::Untouched => "untouched",
            Self::Aborted => "aborted",
        };

        fmt.write_str(name)
    }
}

/// Apply decision procedure to entries.
#[derive(Debug)]
pub struct Reconciler<C = InquireConfirm, G = GitBin>
where
    C: Confirm,
    G: GitRunner,
{
    confirm: C,
    materializer: Materializer<G>,
}

impl<C, G> Reconciler<C, G>
where
    C: Confirm,
    G: GitRunner,
{
    /// Construct new reconciler.
    pub fn new(confirm: C, git: G) -> Self {
        Self {
            confirm,
            materializer: Materializer::new(git),
        }
    }

    /// Access underlying git runner.
    pub fn git(&self) -> &G {
        self.materializer.git()
    }

    /// Reconcile entry against its target.
    ///
    /// # Errors
    ///
    /// - Return [`ReconcileError::Prompt`] if confirmation cannot be obtained.
    /// - Return [`ReconcileError::Remove`] if existing target cannot be removed.
    /// - Return [`ReconcileError::Materialize`] if materialization hits a hard
    ///   error.
    #[instrument(skip(self, root, entry), fields(target = %entry.target.display()), level = "debug")]
    pub fn reconcile(&mut self, root: &RootConfig, entry: &RepositoryEntry) -> Result<Outcome> {
        let target = resolve_target(&root.root, &entry.target);
        let present = is_dir_present(&target);

        if !entry.enable && root.strict && present {
            let message = format!("Are you sure you want to delete {}?", target.display());
            if !root.force && !self.confirm.confirm(&message)? {
                warn!("keeping {:?}", target.display());
                return Ok(Outcome::Aborted);
            }

            remove_target(&target)?;
            return Ok(Outcome::Removed);
        }

        if entry.enable && root.skip && present {
            info!("skipping {:?}", target.display());
            return Ok(Outcome::Skipped);
        }

        if !entry.enable {
            debug!("nothing to do for {:?}", target.display());
            return Ok(Outcome::Untouched);
        }

        if present && !root.force {
            let message = format!("Target {} exists. Delete?", target.display());
            if !self.confirm.confirm(&message)? {
                warn!("keeping {:?}", target.display());
                return Ok(Outcome::Aborted);
            }
        }

        // INVARIANT: Clear out anything at target, not just directories.
        remove_target(&target)?;
        let fetch = self.materializer.materialize(&entry.source, &target)?;
        cleanup(resolve_cleanup(&target, &root.cleanup, &entry.cleanup));

        match fetch {
            Fetch::Complete => Ok(Outcome::Materialized),
            Fetch::Failed { .. } => Ok(Outcome::FetchFailed),
        }
    }
}

fn remove_target(target: &Path) -> Result<()> {
    remove_path(target).map_err(|source| ReconcileError::Remove {
        source,
        path: target.to_path_buf(),
    })?;

    Ok(())
}

/// Reconciliation error types.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Confirmation cannot be obtained from user.
    #[error("failed to ask for confirmation")]
    Prompt(#[source] inquire::error::InquireError),

    /// Existing target cannot be removed.
    #[error("failed to remove {:?}", path.display())]
    Remove {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Materialization hits a hard error.
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// Friendly result alias :3
pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;
