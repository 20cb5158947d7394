// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Git invocation.
//!
//! Easyclone never links against a Git library. Every interaction with a
//! remote goes through the `git` binary with a fixed argument vector. A
//! [`GitCall`] captures one such invocation, and a [`GitRunner`] executes it.
//! Keeping the two apart allows the exact sequence of invocations to be
//! inspected without spawning anything.

use std::{
    ffi::{OsStr, OsString},
    io,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, instrument};

/// Single invocation of the git binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCall {
    /// Arguments passed to git, without the program name.
    pub args: Vec<OsString>,

    /// Working directory to run in, or the current one if absent.
    pub cwd: Option<PathBuf>,
}

impl GitCall {
    /// Construct new git call.
    pub fn new(args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Run call inside target working directory.
    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Shallow clone tip of a branch.
    ///
    /// Clones remote's default branch if no branch is given.
    pub fn clone_branch(url: &str, branch: Option<&str>, target: &Path) -> Self {
        let mut args: Vec<OsString> = vec![
            "clone".into(),
            "--depth=1".into(),
            "--single-branch".into(),
        ];
        if let Some(branch) = branch {
            args.extend([OsString::from("--branch"), OsString::from(branch)]);
        }
        args.extend([OsString::from(url), target.as_os_str().to_os_string()]);

        Self { args, cwd: None }
    }

    /// Shallow fetch exact commit.
    ///
    /// Git cannot shallow clone an arbitrary commit directly. Thus, the
    /// target is initialized as an empty repository, the remote is attached,
    /// only the commit is fetched, and then checked out. Every step runs with
    /// target as working directory, and must run in the given order.
    pub fn pinned_fetch(url: &str, hash: &str, target: &Path) -> [Self; 4] {
        [
            Self::new(["init"]),
            Self::new(["remote", "add", "origin", url]),
            Self::new(["fetch", "--depth=1", "origin", hash]),
            Self::new(["checkout", "FETCH_HEAD"]),
        ]
        .map(|call| call.current_dir(target))
    }

    /// Sub-command name, e.g., "clone" or "fetch".
    pub fn subcommand(&self) -> String {
        self.args
            .first()
            .map(|arg| arg.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Observed result of a git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Whether git exited with zero status.
    pub success: bool,

    /// Captured standard error with trailing newline chomped.
    pub stderr: String,
}

impl GitOutput {
    /// Successful invocation without diagnostics.
    pub fn ok() -> Self {
        Self {
            success: true,
            stderr: String::new(),
        }
    }

    /// Failed invocation with diagnostics.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: stderr.into(),
        }
    }
}

/// Layer of indirection for executing git.
pub trait GitRunner {
    /// Execute git call, and wait for it to exit.
    ///
    /// # Errors
    ///
    /// - Return [`io::Error`] if git could not be spawned at all. A git
    ///   process that runs and exits with non-zero status is not an error.
    fn run(&mut self, call: &GitCall) -> io::Result<GitOutput>;
}

/// Git access through the git binary found on `PATH`.
#[derive(Debug, Clone)]
pub struct GitBin {
    program: OsString,
}

impl GitBin {
    /// Use a specific git executable.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
        }
    }
}

impl Default for GitBin {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRunner for GitBin {
    #[instrument(skip(self, call), level = "debug")]
    fn run(&mut self, call: &GitCall) -> io::Result<GitOutput> {
        debug!("git {:?} in {:?}", call.args, call.cwd);
        let mut command = Command::new(&self.program);
        command.args(&call.args);
        if let Some(cwd) = &call.cwd {
            command.current_dir(cwd);
        }

        let output = command.output()?;
        let stderr = String::from_utf8_lossy(output.stderr.as_slice()).into_owned();

        // INVARIANT: Chomp trailing newlines.
        let stderr = stderr
            .strip_suffix("\r\n")
            .or(stderr.strip_suffix('\n'))
            .map(ToString::to_string)
            .unwrap_or(stderr);

        Ok(GitOutput {
            success: output.status.success(),
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(call: &GitCall) -> Vec<String> {
        call.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn clone_default_branch() {
        let call = GitCall::clone_branch("https://blah.org/foo.git", None, Path::new("ws/foo"));
        let expect = vec![
            "clone",
            "--depth=1",
            "--single-branch",
            "https://blah.org/foo.git",
            "ws/foo",
        ];
        assert_eq!(args(&call), expect);
        assert_eq!(call.cwd, None);
    }

    #[test]
    fn clone_named_branch() {
        let call =
            GitCall::clone_branch("https://blah.org/foo.git", Some("dev"), Path::new("ws/foo"));
        let expect = vec![
            "clone",
            "--depth=1",
            "--single-branch",
            "--branch",
            "dev",
            "https://blah.org/foo.git",
            "ws/foo",
        ];
        assert_eq!(args(&call), expect);
    }

    #[test]
    fn pinned_fetch_steps_in_order() {
        let calls = GitCall::pinned_fetch("https://blah.org/foo.git", "deadbeef", Path::new("ws/foo"));
        let result = calls.iter().map(args).collect::<Vec<_>>();
        let expect = vec![
            vec!["init"],
            vec!["remote", "add", "origin", "https://blah.org/foo.git"],
            vec!["fetch", "--depth=1", "origin", "deadbeef"],
            vec!["checkout", "FETCH_HEAD"],
        ];
        assert_eq!(result, expect);

        for call in &calls {
            assert_eq!(call.cwd, Some(PathBuf::from("ws/foo")));
        }
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let mut git = GitBin::new("easyclone-no-such-git-binary");
        let result = git.run(&GitCall::new(["--version"]));
        assert!(result.is_err());
    }
}
