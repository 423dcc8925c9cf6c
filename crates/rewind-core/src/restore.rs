//! Per-repository restoration.
//!
//! Order of operations: dirty guard, branch selection, cutoff lookup,
//! dry-run exit, checkout, hard reset. Checkout and reset are the only
//! mutations and run only after every check has passed.

use crate::branch::{select_branch, Branch};
use crate::cutoff::{find_cutoff_commit, CommitRef};
use crate::deadline::{Deadline, DeadlineResolver};
use crate::inspect::is_dirty;
use crate::paths;
use crate::vcs::Vcs;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// RestoreOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreOutcome {
    Reset,
    SkippedDirty,
    SkippedNoQualifyingCommit,
    SkippedDryRun,
    FailedCheckout { reason: String },
    FailedReset { reason: String },
}

impl RestoreOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RestoreOutcome::FailedCheckout { .. } | RestoreOutcome::FailedReset { .. }
        )
    }

    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            RestoreOutcome::SkippedDirty | RestoreOutcome::SkippedNoQualifyingCommit
        )
    }
}

impl fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreOutcome::Reset => f.write_str("Reset complete"),
            RestoreOutcome::SkippedDirty => {
                f.write_str("Skipped: working tree has uncommitted changes (use --force)")
            }
            RestoreOutcome::SkippedNoQualifyingCommit => {
                f.write_str("No commit before deadline; leaving repo unchanged")
            }
            RestoreOutcome::SkippedDryRun => f.write_str("Dry run: no changes made"),
            RestoreOutcome::FailedCheckout { reason } => {
                write!(f, "Failed to checkout branch: {reason}")
            }
            RestoreOutcome::FailedReset { reason } => write!(f, "Reset failed: {reason}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RepoReport
// ---------------------------------------------------------------------------

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
    pub name: String,
    pub path: PathBuf,
    /// Absent when the dirty guard stopped the run before branch selection.
    pub branch: Option<Branch>,
    pub commit: Option<CommitRef>,
    pub outcome: RestoreOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Report the target commit without touching the repository.
    pub dry_run: bool,
    /// Reset even when the working tree has uncommitted changes.
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Restorer
// ---------------------------------------------------------------------------

pub struct Restorer<'a> {
    vcs: &'a dyn Vcs,
    resolver: DeadlineResolver,
    remote: String,
}

impl<'a> Restorer<'a> {
    pub fn new(vcs: &'a dyn Vcs, resolver: DeadlineResolver, remote: impl Into<String>) -> Self {
        Self {
            vcs,
            resolver,
            remote: remote.into(),
        }
    }

    pub fn restore(&self, repo: &Path, deadline: &Deadline, opts: RestoreOptions) -> RepoReport {
        let mut report = RepoReport {
            name: paths::repo_name(repo),
            path: repo.to_path_buf(),
            branch: None,
            commit: None,
            outcome: RestoreOutcome::SkippedDirty,
        };

        if !opts.force && is_dirty(self.vcs, repo) {
            info!(repo = %report.name, "skipped: uncommitted changes");
            return report;
        }

        let branch = select_branch(self.vcs, repo, &self.remote);
        info!(repo = %report.name, branch = %branch.name, source = branch.source.as_str(), "branch selected");

        let commit = find_cutoff_commit(self.vcs, &self.resolver, repo, &branch.name, deadline);
        report.branch = Some(branch.clone());

        let Some(commit) = commit else {
            info!(repo = %report.name, "skipped: no commit before deadline");
            report.outcome = RestoreOutcome::SkippedNoQualifyingCommit;
            return report;
        };
        report.commit = Some(commit.clone());

        if opts.dry_run {
            info!(repo = %report.name, sha = %commit.sha, "dry run: would reset");
            report.outcome = RestoreOutcome::SkippedDryRun;
            return report;
        }

        if !branch.is_head() {
            if let Err(e) = self.vcs.checkout(repo, &branch.name) {
                report.outcome = RestoreOutcome::FailedCheckout {
                    reason: e.to_string(),
                };
                return report;
            }
        }

        report.outcome = match self.vcs.hard_reset_to(repo, &commit.sha) {
            Ok(()) => {
                info!(repo = %report.name, sha = %commit.sha, "reset complete");
                RestoreOutcome::Reset
            }
            Err(e) => RestoreOutcome::FailedReset {
                reason: e.to_string(),
            },
        };
        report
    }
}
