// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine where entries land on disk. Targets are always joined onto the
//! configured root, and cleanup paths are always joined onto their target.
//! Absolute values are treated as relative to their base, so they never
//! replace it.

use std::path::{Component, Path, PathBuf};

/// Configuration file used when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "easyclone.yaml";

/// Expand leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or when the home directory cannot be
/// determined, are returned as is.
pub fn expand_home(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Resolve target of an entry relative to root directory.
pub fn resolve_target(root: impl AsRef<Path>, target: impl AsRef<Path>) -> PathBuf {
    join_under(root.as_ref(), target.as_ref())
}

/// Resolve cleanup listing relative to target directory.
///
/// Root-level listing comes first in declared order, then entry-level
/// listing.
pub fn resolve_cleanup<'a>(
    target: &'a Path,
    root_level: &'a [String],
    entry_level: &'a [String],
) -> impl Iterator<Item = PathBuf> + 'a {
    root_level
        .iter()
        .chain(entry_level)
        .map(move |name| join_under(target, Path::new(name)))
}

// INVARIANT: Joined path never replaces its base.
//   - Root and prefix components are dropped instead of restarting the path.
fn join_under(base: &Path, path: &Path) -> PathBuf {
    let relative = path
        .components()
        .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
        .collect::<PathBuf>();
    base.join(relative)
}

/// Check if path is an existing directory.
///
/// Anything else at the path, including a regular file, counts as absent.
pub fn is_dir_present(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[test]
    fn join_target_onto_root() {
        assert_eq!(resolve_target("ws", "libs/foo"), PathBuf::from("ws/libs/foo"));
        assert_eq!(resolve_target(".", "foo"), PathBuf::from("./foo"));
    }

    #[test]
    fn keep_absolute_target_under_root() {
        assert_eq!(resolve_target("ws", "/etc/foo"), PathBuf::from("ws/etc/foo"));
    }

    #[test]
    fn keep_absolute_cleanup_under_target() {
        let entry_level = vec!["/home/blah/outside".to_string()];
        let result =
            resolve_cleanup(Path::new("ws/foo"), &[], &entry_level).collect::<Vec<_>>();
        assert_eq!(result, vec![PathBuf::from("ws/foo/home/blah/outside")]);
    }

    #[test]
    fn order_cleanup_root_level_first() {
        let root_level = vec![".git".to_string(), ".github".to_string()];
        let entry_level = vec!["docs".to_string(), ".git".to_string()];
        let result =
            resolve_cleanup(Path::new("ws/foo"), &root_level, &entry_level).collect::<Vec<_>>();
        let expect = vec![
            PathBuf::from("ws/foo/.git"),
            PathBuf::from("ws/foo/.github"),
            PathBuf::from("ws/foo/docs"),
            PathBuf::from("ws/foo/.git"),
        ];
        assert_eq!(result, expect);
    }

    #[sealed_test(env = [("HOME", "/home/blah")])]
    fn expand_leading_tilde_only() {
        assert_eq!(expand_home("~/src"), PathBuf::from("/home/blah/src"));
        assert_eq!(expand_home("src/~"), PathBuf::from("src/~"));
        assert_eq!(expand_home("."), PathBuf::from("."));
    }

    #[sealed_test]
    fn regular_file_is_not_present_directory() -> anyhow::Result<()> {
        std::fs::write("file", "blah")?;
        std::fs::create_dir("dir")?;
        assert!(!is_dir_present("file"));
        assert!(is_dir_present("dir"));
        assert!(!is_dir_present("missing"));

        Ok(())
    }
}
