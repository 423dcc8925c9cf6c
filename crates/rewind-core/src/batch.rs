//! Batch driver: restore every repository under a root directory.
//!
//! Repositories run one at a time in name order. A failure in one repository
//! is recorded and the batch moves on; only the deadline itself can abort.

use crate::config::RewindConfig;
use crate::deadline::{Deadline, DeadlineResolver};
use crate::error::Result;
use crate::paths;
use crate::restore::{RepoReport, RestoreOptions, RestoreOutcome, Restorer};
use crate::vcs::Vcs;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// The requested calendar date, before the deadline time and grace.
    pub date: NaiveDate,
    pub grace_minutes: i64,
    pub deadline: DateTime<FixedOffset>,
    pub repositories: usize,
    pub reset: usize,
    pub dry_run: usize,
    pub skipped: usize,
    pub failed: usize,
    pub reports: Vec<RepoReport>,
}

impl RunSummary {
    fn new(deadline: &Deadline) -> Self {
        Self {
            date: deadline.date(),
            grace_minutes: deadline.grace_minutes(),
            deadline: deadline.fixed_offset(),
            repositories: 0,
            reset: 0,
            dry_run: 0,
            skipped: 0,
            failed: 0,
            reports: Vec::new(),
        }
    }

    fn record(&mut self, report: RepoReport) {
        let outcome = &report.outcome;
        if outcome.is_failure() {
            self.failed += 1;
        } else if outcome.is_skip() {
            self.skipped += 1;
        } else if *outcome == RestoreOutcome::SkippedDryRun {
            self.dry_run += 1;
        } else {
            self.reset += 1;
        }
        self.reports.push(report);
    }

    /// Resets plus successful previews.
    pub fn successful(&self) -> usize {
        self.reset + self.dry_run
    }

    /// True when no repository ended in a failure.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// How a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// The root directory does not exist or is not a directory.
    MissingRoot(PathBuf),
    Completed(RunSummary),
}

// ---------------------------------------------------------------------------
// BatchDriver
// ---------------------------------------------------------------------------

pub struct BatchDriver<'a> {
    vcs: &'a dyn Vcs,
    resolver: DeadlineResolver,
    remote: String,
    options: RestoreOptions,
}

impl<'a> BatchDriver<'a> {
    /// Validates the configured zone and deadline time up front.
    pub fn new(vcs: &'a dyn Vcs, config: &RewindConfig, options: RestoreOptions) -> Result<Self> {
        Ok(Self {
            vcs,
            resolver: config.resolver()?,
            remote: config.remote.clone(),
            options,
        })
    }

    pub fn resolver(&self) -> &DeadlineResolver {
        &self.resolver
    }

    /// Resolve the run's single deadline. Errors here are fatal for the batch.
    pub fn resolve_deadline(&self, date: &str, grace_minutes: i64) -> Result<Deadline> {
        self.resolver.resolve(date, grace_minutes)
    }

    /// Restore every repository directly under `root`.
    ///
    /// `on_report` is called after each repository with its 1-based position,
    /// the total count, and the report.
    pub fn run<F>(&self, root: &Path, deadline: &Deadline, mut on_report: F) -> Result<BatchStatus>
    where
        F: FnMut(usize, usize, &RepoReport),
    {
        if !root.is_dir() {
            tracing::warn!(root = %root.display(), "root is not a directory");
            return Ok(BatchStatus::MissingRoot(root.to_path_buf()));
        }

        let repos = paths::discover_repositories(root)?;
        let restorer = Restorer::new(self.vcs, self.resolver, self.remote.clone());

        let mut summary = RunSummary::new(deadline);
        summary.repositories = repos.len();
        tracing::info!(root = %root.display(), count = repos.len(), "repositories discovered");

        for (i, repo) in repos.iter().enumerate() {
            let report = restorer.restore(repo, deadline, self.options);
            on_report(i + 1, repos.len(), &report);
            summary.record(report);
        }

        Ok(BatchStatus::Completed(summary))
    }
}
