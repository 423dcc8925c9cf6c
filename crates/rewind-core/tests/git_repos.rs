//! Restoration against real throwaway git repositories.

use rewind_core::branch::{select_branch, BranchSource};
use rewind_core::config::RewindConfig;
use rewind_core::cutoff::find_cutoff_commit;
use rewind_core::deadline::{Deadline, DeadlineResolver};
use rewind_core::git::GitCli;
use rewind_core::inspect::is_dirty;
use rewind_core::restore::{RestoreOptions, RestoreOutcome, Restorer};
use rewind_core::vcs::Vcs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn git(repo: &Path, args: &[&str], date: Option<&str>) -> String {
    let mut cmd = Command::new("git");
    cmd.args(["-c", "commit.gpgsign=false", "-c", "core.hooksPath=/dev/null"])
        .arg("-C")
        .arg(repo)
        .args(args)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "Student")
        .env("GIT_AUTHOR_EMAIL", "student@example.edu")
        .env("GIT_COMMITTER_NAME", "Student")
        .env("GIT_COMMITTER_EMAIL", "student@example.edu");
    if let Some(date) = date {
        cmd.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
    }
    let out = cmd.output().expect("git runs");
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

fn init_repo(path: &Path) {
    std::fs::create_dir_all(path).unwrap();
    git(path, &["init", "-q"], None);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"], None);
}

fn commit(repo: &Path, content: &str, date: &str, message: &str) -> String {
    std::fs::write(repo.join("solution.py"), content).unwrap();
    git(repo, &["add", "-A"], None);
    git(repo, &["commit", "-q", "-m", message], Some(date));
    git(repo, &["rev-parse", "HEAD"], None)
}

fn head(repo: &Path) -> String {
    git(repo, &["rev-parse", "HEAD"], None)
}

fn deadline(date: &str) -> (DeadlineResolver, Deadline) {
    let resolver = DeadlineResolver::default();
    let deadline = resolver.resolve(date, 5).unwrap();
    (resolver, deadline)
}

fn restore(git: &GitCli, repo: &Path, opts: RestoreOptions) -> rewind_core::restore::RepoReport {
    let (resolver, deadline) = deadline("09/10/2025");
    Restorer::new(git, resolver, "origin").restore(repo, &deadline, opts)
}

/// Two commits around the 09/10/2025 deadline.
fn scenario_repo(dir: &TempDir) -> (std::path::PathBuf, String, String) {
    let repo = dir.path().join("hw1");
    init_repo(&repo);
    let on_time = commit(&repo, "v1\n", "2025-09-10 23:10:00 -0500", "finish lab");
    let late = commit(&repo, "v2\n", "2025-09-11 00:10:00 -0500", "late fix");
    (repo, on_time, late)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn resets_to_last_commit_before_deadline() {
    let dir = TempDir::new().unwrap();
    let (repo, on_time, _late) = scenario_repo(&dir);
    let git = GitCli::detect().unwrap();

    let report = restore(&git, &repo, RestoreOptions::default());

    assert_eq!(report.outcome, RestoreOutcome::Reset);
    let commit = report.commit.unwrap();
    assert_eq!(commit.sha, on_time);
    assert_eq!(commit.subject.as_deref(), Some("finish lab"));
    assert_eq!(head(&repo), on_time);
    assert_eq!(std::fs::read_to_string(repo.join("solution.py")).unwrap(), "v1\n");
}

#[test]
fn commit_in_the_deadline_second_is_excluded() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("edge");
    init_repo(&repo);
    let early = commit(&repo, "a\n", "2025-09-10 12:00:00 -0500", "early");
    commit(&repo, "b\n", "2025-09-11 00:04:00 -0500", "exactly at cutoff");
    let git = GitCli::detect().unwrap();

    let report = restore(&git, &repo, RestoreOptions::default());
    assert_eq!(report.commit.unwrap().sha, early);
}

#[test]
fn commit_one_second_before_cutoff_is_included() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("edge");
    init_repo(&repo);
    commit(&repo, "a\n", "2025-09-10 12:00:00 -0500", "early");
    let last = commit(&repo, "b\n", "2025-09-11 00:03:59 -0500", "just in time");
    let git = GitCli::detect().unwrap();

    let report = restore(&git, &repo, RestoreOptions::default());
    assert_eq!(report.commit.unwrap().sha, last);
}

#[test]
fn restore_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let (repo, on_time, _) = scenario_repo(&dir);
    let git = GitCli::detect().unwrap();

    assert_eq!(restore(&git, &repo, RestoreOptions::default()).outcome, RestoreOutcome::Reset);
    assert_eq!(restore(&git, &repo, RestoreOptions::default()).outcome, RestoreOutcome::Reset);
    assert_eq!(head(&repo), on_time);
}

#[test]
fn dirty_repo_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let (repo, _, late) = scenario_repo(&dir);
    std::fs::write(repo.join("solution.py"), "work in progress\n").unwrap();
    let git = GitCli::detect().unwrap();

    assert!(is_dirty(&git, &repo));
    let report = restore(&git, &repo, RestoreOptions::default());
    assert_eq!(report.outcome, RestoreOutcome::SkippedDirty);
    assert_eq!(head(&repo), late);
    assert_eq!(
        std::fs::read_to_string(repo.join("solution.py")).unwrap(),
        "work in progress\n"
    );
}

#[test]
fn untracked_file_counts_as_dirty() {
    let dir = TempDir::new().unwrap();
    let (repo, _, _) = scenario_repo(&dir);
    std::fs::write(repo.join("scratch.txt"), "notes").unwrap();
    let git = GitCli::detect().unwrap();
    assert_eq!(git.working_tree_status(&repo).unwrap().len(), 1);
    assert!(is_dirty(&git, &repo));
}

#[test]
fn force_discards_local_changes() {
    let dir = TempDir::new().unwrap();
    let (repo, on_time, _) = scenario_repo(&dir);
    std::fs::write(repo.join("solution.py"), "work in progress\n").unwrap();
    let git = GitCli::detect().unwrap();

    let report = restore(
        &git,
        &repo,
        RestoreOptions {
            force: true,
            ..RestoreOptions::default()
        },
    );
    assert_eq!(report.outcome, RestoreOutcome::Reset);
    assert_eq!(head(&repo), on_time);
    assert!(!is_dirty(&git, &repo));
}

#[test]
fn dry_run_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let (repo, on_time, late) = scenario_repo(&dir);
    let git = GitCli::detect().unwrap();

    let report = restore(
        &git,
        &repo,
        RestoreOptions {
            dry_run: true,
            ..RestoreOptions::default()
        },
    );
    assert_eq!(report.outcome, RestoreOutcome::SkippedDryRun);
    assert_eq!(report.commit.unwrap().sha, on_time);
    assert_eq!(head(&repo), late);
}

#[test]
fn all_commits_after_deadline_is_skipped() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("late");
    init_repo(&repo);
    let only = commit(&repo, "x\n", "2025-09-12 09:00:00 -0500", "started late");
    let git = GitCli::detect().unwrap();

    let report = restore(&git, &repo, RestoreOptions::default());
    assert_eq!(report.outcome, RestoreOutcome::SkippedNoQualifyingCommit);
    assert_eq!(head(&repo), only);
}

#[test]
fn deadline_year_git_cannot_parse_finds_nothing() {
    let dir = TempDir::new().unwrap();
    let (repo, _, late) = scenario_repo(&dir);
    std::fs::write(repo.join("solution.py"), "uncommitted\n").unwrap();
    let git = GitCli::detect().unwrap();
    let resolver = DeadlineResolver::default();

    for date in ["09/10/0925", "1800-01-01"] {
        let deadline = resolver.resolve(date, 5).unwrap();
        assert!(
            find_cutoff_commit(&git, &resolver, &repo, "main", &deadline).is_none(),
            "{date} matched a commit"
        );

        let report = Restorer::new(&git, resolver, "origin").restore(
            &repo,
            &deadline,
            RestoreOptions {
                force: true,
                ..RestoreOptions::default()
            },
        );
        assert_eq!(report.outcome, RestoreOutcome::SkippedNoQualifyingCommit);
    }

    assert_eq!(head(&repo), late);
    assert_eq!(
        std::fs::read_to_string(repo.join("solution.py")).unwrap(),
        "uncommitted\n"
    );
}

#[test]
fn empty_repository_has_no_qualifying_commit() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("empty");
    init_repo(&repo);
    let git = GitCli::detect().unwrap();

    let report = restore(&git, &repo, RestoreOptions::default());
    assert_eq!(report.outcome, RestoreOutcome::SkippedNoQualifyingCommit);
}

#[test]
fn detached_head_falls_back_to_main() {
    let dir = TempDir::new().unwrap();
    let (repo, on_time, _) = scenario_repo(&dir);
    git(&repo, &["checkout", "-q", "--detach", "HEAD"], None);
    let cli = GitCli::detect().unwrap();

    assert!(cli.current_branch(&repo).is_none());
    let branch = select_branch(&cli, &repo, "origin");
    assert_eq!(branch.name, "main");
    assert_eq!(branch.source, BranchSource::Main);

    let report = restore(&cli, &repo, RestoreOptions::default());
    assert_eq!(report.outcome, RestoreOutcome::Reset);
    assert_eq!(git(&repo, &["rev-parse", "--abbrev-ref", "HEAD"], None), "main");
    assert_eq!(head(&repo), on_time);
}

#[test]
fn detached_head_prefers_remote_default() {
    let dir = TempDir::new().unwrap();
    let (repo, _, late) = scenario_repo(&dir);
    git(&repo, &["branch", "trunk"], None);
    git(&repo, &["update-ref", "refs/remotes/origin/trunk", &late], None);
    git(
        &repo,
        &["symbolic-ref", "refs/remotes/origin/HEAD", "refs/remotes/origin/trunk"],
        None,
    );
    git(&repo, &["checkout", "-q", "--detach", "HEAD"], None);
    let cli = GitCli::detect().unwrap();

    let branch = select_branch(&cli, &repo, "origin");
    assert_eq!(branch.name, "trunk");
    assert_eq!(branch.source, BranchSource::RemoteDefault);
}

#[test]
fn current_branch_is_kept_even_when_main_exists() {
    let dir = TempDir::new().unwrap();
    let (repo, _, _) = scenario_repo(&dir);
    git(&repo, &["checkout", "-q", "-b", "lab2"], None);
    let cli = GitCli::detect().unwrap();

    let branch = select_branch(&cli, &repo, "origin");
    assert_eq!(branch.name, "lab2");
    assert_eq!(branch.source, BranchSource::Current);
}

#[test]
fn commit_timestamp_is_iso8601() {
    let dir = TempDir::new().unwrap();
    let (repo, on_time, _) = scenario_repo(&dir);
    let cli = GitCli::detect().unwrap();
    assert_eq!(
        cli.commit_timestamp(&repo, &on_time).as_deref(),
        Some("2025-09-10T23:10:00-05:00")
    );
}

#[test]
fn configured_remote_is_consulted() {
    let dir = TempDir::new().unwrap();
    let (repo, _, late) = scenario_repo(&dir);
    git(&repo, &["branch", "release"], None);
    git(&repo, &["update-ref", "refs/remotes/upstream/release", &late], None);
    git(
        &repo,
        &["symbolic-ref", "refs/remotes/upstream/HEAD", "refs/remotes/upstream/release"],
        None,
    );
    git(&repo, &["checkout", "-q", "--detach", "HEAD"], None);
    let cli = GitCli::detect().unwrap();

    let cfg = RewindConfig {
        remote: "upstream".into(),
        ..RewindConfig::default()
    };
    assert_eq!(select_branch(&cli, &repo, &cfg.remote).name, "release");
    assert_eq!(select_branch(&cli, &repo, "origin").name, "main");
}
