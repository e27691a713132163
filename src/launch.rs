//! Decide between attach, switch and create for a selected project, then
//! hand the terminal over to tmux.

use std::io::Write;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::actions::Action;
use crate::error::{BoError, Result};
use crate::output::Console;
use crate::runner::CommandRunner;
use crate::tmux::{basename, find_descriptor, name_from_descriptor, TmuxClient};

/// Choose the action for `project`.
///
/// Issues at most one `has-session` query and none when the project has no
/// descriptor.
pub async fn decide(
    runner: &impl CommandRunner,
    tmux: &TmuxClient,
    project: &Path,
    descriptor_stem: &str,
    inside_client: bool,
) -> Action {
    let Some(descriptor) = find_descriptor(project, descriptor_stem) else {
        return Action::PrintPath(project.to_path_buf());
    };

    let name = name_from_descriptor(&descriptor).unwrap_or_else(|| basename(project));
    if !tmux.has_session(runner, &name).await {
        return Action::Load {
            descriptor,
            inside_client,
        };
    }

    if inside_client {
        Action::Switch(name)
    } else {
        Action::Attach(name)
    }
}

/// Carry out an action. Multiplexer actions run in the foreground with the
/// terminal inherited and return when the user detaches.
pub async fn execute<O: Write, E: Write>(
    action: &Action,
    tmux: &TmuxClient,
    descriptor_stem: &str,
    console: &mut Console<O, E>,
) -> Result<()> {
    let cmd = match action {
        Action::PrintPath(path) => {
            console.notice(&format!(
                "No {}.yaml found in {}",
                descriptor_stem,
                path.display()
            ))?;
            console.emit(&path.display().to_string())?;
            return Ok(());
        }
        Action::Attach(name) => tmux.attach_command(name),
        Action::Switch(name) => tmux.switch_command(name),
        Action::Load {
            descriptor,
            inside_client,
        } => tmux.load_command(descriptor, *inside_client),
    };

    tracing::info!("running {}", cmd.join(" "));
    let status = Command::new(&cmd[0])
        .args(&cmd[1..])
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BoError::ToolMissing(cmd[0].clone()),
            _ => BoError::Io(e),
        })?;

    if !status.success() {
        tracing::warn!("{} exited with {}", cmd[0], status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferConsole;
    use crate::runner::fake::FakeRunner;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const STEM: &str = ".tmuxp";

    fn project_with_descriptor(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("api");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join(".tmuxp.yaml"), contents).unwrap();
        (dir, project)
    }

    #[tokio::test]
    async fn test_no_descriptor_prints_path() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::new().respond("has-session", true, "");
        let tmux = TmuxClient::default();

        let action = decide(&runner, &tmux, dir.path(), STEM, false).await;

        assert_eq!(action, Action::PrintPath(dir.path().to_path_buf()));
        assert!(runner.calls().is_empty());

        let mut console = BufferConsole::buffered();
        execute(&action, &tmux, STEM, &mut console).await.unwrap();
        assert_eq!(console.out_text(), format!("{}\n", dir.path().display()));
        assert!(console.err_text().contains("No .tmuxp.yaml found"));
    }

    #[tokio::test]
    async fn test_no_session_loads_descriptor() {
        let (_dir, project) = project_with_descriptor("session_name: backend\n");
        let runner = FakeRunner::new().respond("has-session", false, "");

        let action = decide(&runner, &TmuxClient::default(), &project, STEM, false).await;

        assert_eq!(
            action,
            Action::Load {
                descriptor: project.join(".tmuxp.yaml"),
                inside_client: false,
            }
        );
        assert_eq!(runner.calls(), vec!["tmux has-session -t =backend"]);
    }

    #[tokio::test]
    async fn test_running_session_inside_client_switches() {
        let (_dir, project) = project_with_descriptor("session_name: backend\n");
        let runner = FakeRunner::new().respond("has-session -t =backend", true, "");

        let action = decide(&runner, &TmuxClient::default(), &project, STEM, true).await;

        assert_eq!(action, Action::Switch("backend".to_string()));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_running_session_outside_client_attaches() {
        let (_dir, project) = project_with_descriptor("windows: []\n");
        let runner = FakeRunner::new().respond("has-session -t =api", true, "");

        let action = decide(&runner, &TmuxClient::default(), &project, STEM, false).await;

        assert_eq!(action, Action::Attach("api".to_string()));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_tmux_loads_descriptor() {
        let (_dir, project) = project_with_descriptor("session_name: backend\n");
        let runner = FakeRunner::new().missing("tmux");

        let action = decide(&runner, &TmuxClient::default(), &project, STEM, true).await;

        assert!(matches!(action, Action::Load { inside_client: true, .. }));
    }
}
