use crate::deadline::{parse_commit_timestamp, Deadline, DeadlineResolver};
use crate::vcs::Vcs;
use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// The commit a repository is restored to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRef {
    pub sha: String,
    pub committed_at: DateTime<FixedOffset>,
    pub subject: Option<String>,
}

/// Find the newest commit on `rev` committed strictly before the deadline.
///
/// `git rev-list --before` is inclusive and committer times are whole
/// seconds, so asking for `deadline - 1s` excludes a commit made in the
/// deadline's own second.
///
/// git's pick is checked against the deadline before it is returned. Its date
/// parser misreads years it cannot represent and falls back to the branch tip,
/// so a commit whose time cannot be read back, or that is not strictly before
/// the deadline, yields `None`.
pub fn find_cutoff_commit(
    vcs: &dyn Vcs,
    resolver: &DeadlineResolver,
    repo: &Path,
    rev: &str,
    deadline: &Deadline,
) -> Option<CommitRef> {
    let until = deadline.instant() - TimeDelta::seconds(1);
    let until = resolver.format_for_query(&until);

    let sha = vcs.most_recent_commit_before(repo, rev, &until)?;

    let Some(committed_at) = vcs
        .commit_timestamp(repo, &sha)
        .and_then(|ts| parse_commit_timestamp(&ts).ok())
    else {
        warn!(repo = %repo.display(), %sha, "commit time unreadable; not trusting it as a cutoff");
        return None;
    };
    if committed_at >= deadline.fixed_offset() {
        warn!(repo = %repo.display(), %sha, query = %until, "git returned a commit at or after the deadline");
        return None;
    }
    let subject = vcs.commit_subject(repo, &sha);

    Some(CommitRef {
        sha,
        committed_at,
        subject,
    })
}
