use std::path::{Path, PathBuf};

/// Resolve the directory of repositories given on the command line.
///
/// A leading `~` expands to the home directory, relative paths are joined
/// onto the current directory, and the result is canonicalized when it
/// exists. A path that does not exist is returned as-is for the caller to
/// report.
pub fn resolve_root(given: &Path) -> PathBuf {
    let expanded = expand_home(given);

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(expanded)
    };

    std::fs::canonicalize(&absolute).unwrap_or(absolute)
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match home::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
