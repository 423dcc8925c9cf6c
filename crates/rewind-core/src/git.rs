//! [`Vcs`] backed by the `git` command line.
//!
//! Every call is a blocking `git -C <repo> ...` invocation with no timeout.

use crate::error::{Result, RewindError};
use crate::vcs::Vcs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    /// Locate `git` on `PATH`.
    pub fn detect() -> Result<Self> {
        let program = which::which("git").map_err(|_| RewindError::GitNotFound)?;
        Ok(Self { program })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn output(&self, repo: &Path, args: &[&str]) -> Result<Output> {
        tracing::debug!(repo = %repo.display(), "git {}", args.join(" "));
        let mut cmd_args: Vec<OsString> = vec!["-C".into(), repo.as_os_str().to_owned()];
        cmd_args.extend(args.iter().map(OsString::from));
        Command::new(&self.program)
            .args(&cmd_args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| RewindError::GitSpawn(e.to_string()))
    }

    /// Run git and return trimmed stdout, or `GitFailed` on non-zero exit.
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String> {
        let output = self.output(repo, args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(repo = %repo.display(), "git {} failed: {stderr}", args.join(" "));
            return Err(RewindError::GitFailed {
                args: args.join(" "),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Like [`run`](Self::run) but collapses failures and empty output to `None`.
    fn query(&self, repo: &Path, args: &[&str]) -> Option<String> {
        let output = self.output(repo, args).ok()?;
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl Vcs for GitCli {
    fn current_branch(&self, repo: &Path) -> Option<String> {
        self.query(repo, &["rev-parse", "--abbrev-ref", "HEAD"])
            .filter(|name| name != crate::paths::HEAD)
    }

    fn remote_default_branch(&self, repo: &Path, remote: &str) -> Option<String> {
        let pointer = format!("refs/remotes/{remote}/HEAD");
        let short = self.query(repo, &["symbolic-ref", "--short", &pointer])?;
        short
            .strip_prefix(&format!("{remote}/"))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    fn branch_exists(&self, repo: &Path, name: &str) -> bool {
        let refname = format!("refs/heads/{name}");
        self.output(repo, &["show-ref", "--verify", "--quiet", &refname])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn most_recent_commit_before(&self, repo: &Path, rev: &str, until: &str) -> Option<String> {
        let before = format!("--before={until}");
        self.query(repo, &["rev-list", "-1", &before, rev, "--"])
    }

    fn commit_timestamp(&self, repo: &Path, sha: &str) -> Option<String> {
        self.query(repo, &["show", "-s", "--format=%cI", sha])
    }

    fn commit_subject(&self, repo: &Path, sha: &str) -> Option<String> {
        self.query(repo, &["show", "-s", "--format=%s", sha])
    }

    fn working_tree_status(&self, repo: &Path) -> Result<Vec<String>> {
        let out = self.run(repo, &["status", "--porcelain"])?;
        Ok(out
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    fn checkout(&self, repo: &Path, branch: &str) -> Result<()> {
        self.run(repo, &["checkout", "-q", branch]).map(|_| ())
    }

    fn hard_reset_to(&self, repo: &Path, sha: &str) -> Result<()> {
        self.run(repo, &["reset", "-q", "--hard", sha]).map(|_| ())
    }
}
