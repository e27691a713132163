use std::path::Path;

use super::VcsStatus;
use crate::runner::CommandRunner;

/// Whether the path lies inside a git working tree
pub async fn is_work_tree(runner: &impl CommandRunner, project: &Path) -> bool {
    let dir = project.to_string_lossy();
    match runner
        .run("git", &["-C", &dir, "rev-parse", "--is-inside-work-tree"])
        .await
    {
        Ok(output) => output.success && output.stdout.trim() == "true",
        Err(e) => {
            tracing::debug!("git rev-parse in {} failed: {}", dir, e);
            false
        }
    }
}

/// Clean/dirty state of the working tree, or `NotARepo`.
///
/// A failing `git status` inside a work tree is reported as `NotARepo`, the
/// "unknown" glyph.
pub async fn probe(runner: &impl CommandRunner, project: &Path) -> VcsStatus {
    if !is_work_tree(runner, project).await {
        return VcsStatus::NotARepo;
    }

    let dir = project.to_string_lossy();
    match runner.run("git", &["-C", &dir, "status", "--porcelain"]).await {
        Ok(output) if output.success => {
            if output.stdout.trim().is_empty() {
                VcsStatus::Clean
            } else {
                VcsStatus::Dirty
            }
        }
        Ok(_) => VcsStatus::NotARepo,
        Err(e) => {
            tracing::debug!("git status in {} failed: {}", dir, e);
            VcsStatus::NotARepo
        }
    }
}
