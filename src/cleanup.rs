// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Post-materialization cleanup.
//!
//! Once a target has been cloned or copied, some of what came along is
//! unwanted, e.g., the `.git` directory of a vendored repository. Cleanup
//! removes a listing of such paths relative to the target. It is best effort:
//! a path that does not exist is ignored, and a path that cannot be removed is
//! only reported at debug level.

use std::{fs, io, path::Path};
use tracing::{debug, info, instrument};

/// Remove file or directory at path.
///
/// Directories are removed recursively. Symbolic links are removed without
/// touching what they point to. Returns `false` if nothing exists at path.
///
/// # Errors
///
/// - Return [`io::Error`] if something exists at path, but cannot be removed.
pub fn remove_path(path: impl AsRef<Path>) -> io::Result<bool> {
    let path = path.as_ref();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(error),
    };

    info!("deleting {:?}", path.display());
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }

    Ok(true)
}

/// Remove every path in listing, in order.
///
/// Failures are swallowed. Cleanup never aborts a run.
#[instrument(skip(paths), level = "debug")]
pub fn cleanup(paths: impl IntoIterator<Item = impl AsRef<Path>>) {
    for path in paths {
        if let Err(error) = remove_path(path.as_ref()) {
            debug!("failed to clean up {:?}: {error}", path.as_ref().display());
        }
    }
}
