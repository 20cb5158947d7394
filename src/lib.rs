// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Declarative multi-repository workspace bootstrapping.
//!
//! Easyclone reads a single configuration file that maps __targets__ to
//! __sources__, and makes the file system match it. A source is either a
//! remote repository that gets shallow cloned, or a local directory that gets
//! copied. Each declared __entry__ is reconciled against whatever already
//! sits at its target: it can be skipped, removed, or replaced wholesale.
//!
//! # Reconciliation Flags
//!
//! Four independent flags drive what happens to each entry:
//!
//! - `enable` (per entry): whether the entry should exist at all.
//! - `strict` (root): actively remove targets of disabled entries.
//! - `skip` (root): leave existing targets of enabled entries alone.
//! - `force` (root): never ask before destroying an existing target.
//!
//! See [`reconcile`] for the full decision procedure.
//!
//! # Processing Model
//!
//! Entries are processed one after another in declared order. Nothing is done
//! in parallel. A hard failure, e.g., a copy that cannot write to disk, stops
//! the whole run. A git invocation that exits with non-zero status does not.

pub mod cleanup;
pub mod config;
pub mod path;
pub mod reconcile;
pub mod source;
pub mod sync;

pub use config::{Config, ConfigError, RepositoryEntry, Revision, RootConfig, Source};
pub use reconcile::{Confirm, Outcome, Reconciler};
pub use source::{
    git::{GitBin, GitCall, GitOutput, GitRunner},
    Fetch, Materializer,
};
pub use sync::{sync, Report, SyncError};
