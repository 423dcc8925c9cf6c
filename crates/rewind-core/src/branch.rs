//! Branch selection.
//!
//! Rules are tried in order and the first one that yields a name wins:
//!
//! 1. the checked-out branch, unless HEAD is detached
//! 2. the local name behind the remote's default-branch pointer
//! 3. `main`, if it exists
//! 4. `master`, if it exists
//! 5. `HEAD`, which always resolves

use crate::paths::HEAD;
use crate::vcs::Vcs;
use serde::Serialize;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// BranchSource / Branch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchSource {
    Current,
    RemoteDefault,
    Main,
    Master,
    Head,
}

impl BranchSource {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchSource::Current => "current branch",
            BranchSource::RemoteDefault => "remote default",
            BranchSource::Main => "main",
            BranchSource::Master => "master",
            BranchSource::Head => "head pointer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    pub source: BranchSource,
}

impl Branch {
    /// True for the generic head pointer, which is never checked out.
    pub fn is_head(&self) -> bool {
        self.source == BranchSource::Head
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Context a rule can consult.
pub struct Probe<'a> {
    pub vcs: &'a dyn Vcs,
    pub repo: &'a Path,
    pub remote: &'a str,
}

type Rule = fn(&Probe<'_>) -> Option<String>;

const RULES: &[(BranchSource, Rule)] = &[
    (BranchSource::Current, current),
    (BranchSource::RemoteDefault, remote_default),
    (BranchSource::Main, main_branch),
    (BranchSource::Master, master_branch),
];

fn current(probe: &Probe<'_>) -> Option<String> {
    probe.vcs.current_branch(probe.repo)
}

fn remote_default(probe: &Probe<'_>) -> Option<String> {
    probe.vcs.remote_default_branch(probe.repo, probe.remote)
}

fn main_branch(probe: &Probe<'_>) -> Option<String> {
    existing(probe, "main")
}

fn master_branch(probe: &Probe<'_>) -> Option<String> {
    existing(probe, "master")
}

fn existing(probe: &Probe<'_>, name: &str) -> Option<String> {
    probe
        .vcs
        .branch_exists(probe.repo, name)
        .then(|| name.to_string())
}

/// Pick the branch to restore in `repo`. Never fails.
pub fn select_branch(vcs: &dyn Vcs, repo: &Path, remote: &str) -> Branch {
    let probe = Probe { vcs, repo, remote };
    RULES
        .iter()
        .find_map(|(source, rule)| {
            rule(&probe).map(|name| Branch {
                name,
                source: *source,
            })
        })
        .unwrap_or_else(|| Branch {
            name: HEAD.to_string(),
            source: BranchSource::Head,
        })
}
