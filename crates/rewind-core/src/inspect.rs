use crate::vcs::Vcs;
use std::path::Path;

/// True if the working tree or index differs from the last commit.
///
/// A status query that fails counts as dirty: a tree that cannot be shown
/// clean is not reset without `--force`.
pub fn is_dirty(vcs: &dyn Vcs, repo: &Path) -> bool {
    match vcs.working_tree_status(repo) {
        Ok(entries) => !entries.is_empty(),
        Err(e) => {
            tracing::warn!(repo = %repo.display(), "status check failed, treating as dirty: {e}");
            true
        }
    }
}
