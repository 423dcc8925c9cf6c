//! The version-control capabilities the restorer needs.
//!
//! Queries that can legitimately come back empty return `Option`; the two
//! mutations and the status query return `Result` so their failures can be
//! reported per repository.

use crate::error::Result;
use std::path::Path;

pub trait Vcs {
    /// The checked-out branch name, or `None` when HEAD is detached.
    fn current_branch(&self, repo: &Path) -> Option<String>;

    /// Local branch name mirrored from `<remote>/HEAD`, if that pointer exists.
    fn remote_default_branch(&self, repo: &Path, remote: &str) -> Option<String>;

    fn branch_exists(&self, repo: &Path, name: &str) -> bool;

    /// Newest commit reachable from `rev` whose committer time is at or
    /// before `until`, given as `YYYY-MM-DD HH:MM:SS ±HHMM`.
    fn most_recent_commit_before(&self, repo: &Path, rev: &str, until: &str) -> Option<String>;

    /// Committer timestamp in strict ISO-8601.
    fn commit_timestamp(&self, repo: &Path, sha: &str) -> Option<String>;

    fn commit_subject(&self, repo: &Path, sha: &str) -> Option<String>;

    /// One entry per changed, staged, deleted or untracked path.
    fn working_tree_status(&self, repo: &Path) -> Result<Vec<String>>;

    fn checkout(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Move the branch, index and working tree to `sha`, discarding changes.
    fn hard_reset_to(&self, repo: &Path, sha: &str) -> Result<()>;
}
