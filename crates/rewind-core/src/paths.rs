use crate::error::Result;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const GIT_DIR: &str = ".git";
pub const CONFIG_FILE: &str = ".rewind.yaml";

/// The generic head pointer, used when no named branch can be resolved.
pub const HEAD: &str = "HEAD";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// A directory is treated as a repository when it holds a `.git` directory.
pub fn is_repository(dir: &Path) -> bool {
    dir.join(GIT_DIR).is_dir()
}

/// Immediate subdirectories of `root` that are repositories, sorted by name.
pub fn discover_repositories(root: &Path) -> Result<Vec<PathBuf>> {
    let mut repos = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() && is_repository(&path) {
            repos.push(path);
        }
    }
    repos.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(repos)
}

/// Display name for a repository: its directory name.
pub fn repo_name(repo: &Path) -> String {
    repo.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discovers_only_git_subdirectories_in_order() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            std::fs::create_dir_all(dir.path().join(name).join(GIT_DIR)).unwrap();
        }
        std::fs::create_dir_all(dir.path().join("plain")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        // A .git *file* (worktree pointer) does not qualify.
        std::fs::create_dir_all(dir.path().join("linked")).unwrap();
        std::fs::write(dir.path().join("linked").join(GIT_DIR), "gitdir: ../x").unwrap();

        let repos = discover_repositories(dir.path()).unwrap();
        let names: Vec<String> = repos.iter().map(|p| repo_name(p)).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(discover_repositories(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn nested_repositories_are_not_discovered() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("group/inner").join(GIT_DIR)).unwrap();
        assert!(discover_repositories(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/course");
        assert_eq!(config_path(root), PathBuf::from("/tmp/course/.rewind.yaml"));
        assert_eq!(repo_name(Path::new("/tmp/course/hw1-alice")), "hw1-alice");
    }
}
