use rewind_core::batch::RunSummary;
use rewind_core::deadline::DeadlineResolver;
use rewind_core::restore::{RepoReport, RestoreOutcome};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Lines of the human report for one repository, header included.
pub fn repo_lines(
    index: usize,
    total: usize,
    report: &RepoReport,
    resolver: &DeadlineResolver,
) -> Vec<String> {
    let mut lines = vec![format!("[{index}/{total}] {}", report.name)];

    if let Some(branch) = &report.branch {
        if report.commit.is_some() {
            lines.push(format!("  - Target branch: {branch}"));
        }
    }

    if let Some(commit) = &report.commit {
        let mut line = format!(
            "  - Commit before deadline: {} @ {}",
            commit.sha,
            resolver.format_for_display(&commit.committed_at)
        );
        if let Some(subject) = &commit.subject {
            line.push_str(&format!(" - {subject}"));
        }
        lines.push(line);
    }

    // Dry runs stop at the commit line.
    if report.outcome != RestoreOutcome::SkippedDryRun {
        lines.push(format!("  - {}", report.outcome));
    }
    lines
}

pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "Done. Successful: {}, Skipped: {}, Failed: {}",
        summary.successful(),
        summary.skipped,
        summary.failed
    )
}
