// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Local directory copy.

use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Recursively copy directory `from` into directory `to`.
///
/// Creates `to` and any missing parents. Directory structure of `from` is
/// mirrored exactly. Symbolic links are followed, so linked files land in
/// `to` as regular files.
///
/// # Errors
///
/// - Return [`CopyError::Walk`] if `from` cannot be traversed.
/// - Return [`CopyError::CreateDir`] if a directory cannot be created.
/// - Return [`CopyError::CopyFile`] if a file cannot be copied.
#[instrument(skip(from, to), level = "debug")]
pub fn copy_dir(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
    let (from, to) = (from.as_ref(), to.as_ref());
    create_dir(to)?;

    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(true).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|_| CopyError::Escape {
                path: entry.path().to_path_buf(),
            })?;
        let destination = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&destination)?;
        } else if entry.file_type().is_file() {
            debug!("copy {:?}", relative.display());
            fs::copy(entry.path(), &destination).map_err(|source| CopyError::CopyFile {
                source,
                from: entry.path().to_path_buf(),
                to: destination.clone(),
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn create_dir(path: &Path) -> Result<()> {
    mkdirp::mkdirp(path).map_err(|source| CopyError::CreateDir {
        source,
        path: path.to_path_buf(),
    })?;

    Ok(())
}

/// Local copy error types.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Source directory cannot be traversed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Directory cannot be created in destination.
    #[error("failed to create directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be copied into destination.
    #[error("failed to copy {:?} to {:?}", from.display(), to.display())]
    CopyFile {
        #[source]
        source: std::io::Error,
        from: PathBuf,
        to: PathBuf,
    },

    /// Walked path is not inside source directory.
    #[error("path {:?} escapes source directory", path.display())]
    Escape { path: PathBuf },
}

/// Friendly result alias :3
pub type Result<T, E = CopyError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::fs::{create_dir_all, read_to_string, write};

    #[sealed_test]
    fn mirror_directory_structure() -> anyhow::Result<()> {
        create_dir_all("src/nested/deeper")?;
        create_dir_all("src/empty")?;
        write("src/top", "top")?;
        write("src/nested/middle", "middle")?;
        write("src/nested/deeper/bottom", "bottom")?;

        let copied = copy_dir("src", "out/dest")?;
        assert_eq!(copied, 3);
        assert_eq!(read_to_string("out/dest/top")?, "top");
        assert_eq!(read_to_string("out/dest/nested/middle")?, "middle");
        assert_eq!(read_to_string("out/dest/nested/deeper/bottom")?, "bottom");
        assert!(Path::new("out/dest/empty").is_dir());

        Ok(())
    }

    #[sealed_test]
    fn copy_into_existing_directory() -> anyhow::Result<()> {
        create_dir_all("src")?;
        create_dir_all("dest")?;
        write("src/file", "new")?;
        write("dest/other", "old")?;

        copy_dir("src", "dest")?;
        assert_eq!(read_to_string("dest/file")?, "new");
        assert_eq!(read_to_string("dest/other")?, "old");

        Ok(())
    }

    #[sealed_test]
    fn missing_source_fails() {
        let result = copy_dir("no-such-dir", "dest");
        assert!(matches!(result, Err(CopyError::Walk(_))));
    }
}
