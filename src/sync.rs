// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Run driver.
//!
//! Reconcile every entry of a configuration, one after another, in declared
//! order. An entry is fully processed, including every git invocation and
//! file system operation, before the next one begins.

use crate::{
    config::Config,
    reconcile::{Confirm, Outcome, ReconcileError, Reconciler},
    source::git::GitRunner,
};

use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};
use tracing::{info, instrument, warn};

/// Tally of outcomes over a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<(PathBuf, Outcome)>,
}

impl Report {
    /// Record outcome of entry.
    pub fn record(&mut self, target: impl Into<PathBuf>, outcome: Outcome) {
        self.outcomes.push((target.into(), outcome));
    }

    /// Outcomes in processing order.
    pub fn outcomes(&self) -> &[(PathBuf, Outcome)] {
        &self.outcomes
    }

    /// Number of entries that ended in given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, recorded)| *recorded == outcome)
            .count()
    }

    /// Targets whose fetch failed.
    pub fn failures(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::FetchFailed)
            .map(|(target, _)| target)
    }
}

impl Display for Report {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let mut counts: HashMap<Outcome, usize> = HashMap::new();
        for (_, outcome) in &self.outcomes {
            *counts.entry(*outcome).or_default() += 1;
        }

        let summary = [
            Outcome::Materialized,
            Outcome::FetchFailed,
            Outcome::Skipped,
            Outcome::Removed,
            Outcome::Aborted,
            Outcome::Untouched,
        ]
        .into_iter()
        .filter_map(|outcome| counts.get(&outcome).map(|count| format!("{count} {outcome}")))
        .collect::<Vec<_>>();

        if summary.is_empty() {
            fmt.write_str("no entries")
        } else {
            fmt.write_str(&summary.join(", "))
        }
    }
}

/// Reconcile every entry of configuration in declared order.
///
/// # Errors
///
/// - Return [`SyncError`] naming the target of the first entry that hit a
///   hard error. No entry after it is processed.
#[instrument(skip(config, reconciler), level = "debug")]
pub fn sync<C, G>(config: &Config, reconciler: &mut Reconciler<C, G>) -> Result<Report>
where
    C: Confirm,
    G: GitRunner,
{
    let mut report = Report::default();
    for entry in &config.repositories {
        let outcome = reconciler
            .reconcile(&config.root, entry)
            .map_err(|source| SyncError {
                source,
                target: entry.target.clone(),
            })?;
        report.record(&entry.target, outcome);
    }

    for target in report.failures() {
        warn!("failed to fetch {:?}", target.display());
    }
    info!("done: {report}");

    Ok(report)
}

/// Run aborted on hard error.
#[derive(Debug, thiserror::Error)]
#[error("failed to process {:?}", target.display())]
pub struct SyncError {
    #[source]
    pub source: ReconcileError,
    pub target: PathBuf,
}

/// Friendly result alias :3
pub type Result<T, E = SyncError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{RepositoryEntry, Revision, RootConfig, Source},
        source::{git::GitOutput, tests::RecordingGit},
    };
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{
        fs::{create_dir_all, write},
        path::Path,
    };

    fn config(repositories: Vec<RepositoryEntry>) -> Config {
        Config {
            root: RootConfig {
                root: PathBuf::from("ws"),
                strict: true,
                force: true,
                skip: false,
                cleanup: vec![".git".into()],
            },
            repositories,
        }
    }

    fn entry(target: &str, source: Source) -> RepositoryEntry {
        RepositoryEntry {
            target: PathBuf::from(target),
            source,
            enable: true,
            cleanup: vec![],
        }
    }

    fn remote(url: &str) -> Source {
        Source::Remote {
            url: url.into(),
            revision: Revision::Default,
        }
    }

    fn local(path: &str) -> Source {
        Source::Local {
            path: PathBuf::from(path),
        }
    }

    #[sealed_test]
    fn process_entries_in_declared_order() -> anyhow::Result<()> {
        create_dir_all("local")?;
        write("local/file", "blah")?;
        create_dir_all("ws/gone")?;

        let config = config(vec![
            entry("a", remote("https://blah.org/a.git")),
            entry("b", local("local")),
            RepositoryEntry {
                enable: false,
                ..entry("gone", local("local"))
            },
            entry("c", remote("https://blah.org/c.git")),
        ]);
        let git = RecordingGit::scripted([Ok(GitOutput::ok()), Ok(GitOutput::failed("fatal"))]);
        let mut reconciler = Reconciler::new(|_: &str| false, git);
        let report = sync(&config, &mut reconciler)?;

        let expect = vec![
            (PathBuf::from("a"), Outcome::Materialized),
            (PathBuf::from("b"), Outcome::Materialized),
            (PathBuf::from("gone"), Outcome::Removed),
            (PathBuf::from("c"), Outcome::FetchFailed),
        ];
        assert_eq!(report.outcomes(), expect.as_slice());
        assert_eq!(report.count(Outcome::Materialized), 2);
        assert_eq!(report.failures().collect::<Vec<_>>(), vec![&PathBuf::from("c")]);
        assert_eq!(report.to_string(), "2 materialized, 1 failed, 1 removed");
        assert!(Path::new("ws/b/file").is_file());
        assert!(!Path::new("ws/gone").exists());

        Ok(())
    }

    #[sealed_test]
    fn hard_error_stops_run() {
        let config = config(vec![
            entry("a", local("no-such-dir")),
            entry("b", remote("https://blah.org/b.git")),
        ]);
        let mut reconciler = Reconciler::new(|_: &str| false, RecordingGit::default());
        let result = sync(&config, &mut reconciler);

        match result {
            Err(error) => assert_eq!(error.target, PathBuf::from("a")),
            Ok(report) => panic!("expected hard error, got {report}"),
        }
        assert!(reconciler.git().calls.is_empty());
    }

    #[test]
    fn empty_report_summary() {
        assert_eq!(Report::default().to_string(), "no entries");
    }
}
