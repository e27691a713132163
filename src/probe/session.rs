use std::path::Path;

use super::SessionStatus;
use crate::runner::CommandRunner;
use crate::tmux::{resolve_session_name, TmuxClient};

/// Whether tmux reports a running session under the project's session name
pub async fn probe(
    runner: &impl CommandRunner,
    tmux: &TmuxClient,
    project: &Path,
    descriptor_stem: &str,
) -> SessionStatus {
    let name = resolve_session_name(project, descriptor_stem);
    if tmux.has_session(runner, &name).await {
        SessionStatus::Active
    } else {
        SessionStatus::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::FakeRunner;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_uses_descriptor_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".tmuxp.yaml"), "session_name: dash\n").unwrap();

        let runner = FakeRunner::new().respond("has-session -t =dash", true, "");
        let status = probe(&runner, &TmuxClient::default(), dir.path(), ".tmuxp").await;

        assert_eq!(status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_query_failure_is_inactive() {
        let runner = FakeRunner::new().missing("has-session");
        let status = probe(
            &runner,
            &TmuxClient::default(),
            Path::new("/srv/app"),
            ".tmuxp",
        )
        .await;

        assert_eq!(status, SessionStatus::Inactive);
        assert_eq!(runner.calls(), vec!["tmux has-session -t =app"]);
    }

    #[tokio::test]
    async fn test_timed_out_query_is_inactive() {
        let runner = FakeRunner::new().timeout("has-session");
        let status = probe(
            &runner,
            &TmuxClient::default(),
            Path::new("/srv/app"),
            ".tmuxp",
        )
        .await;

        assert_eq!(status, SessionStatus::Inactive);
    }
}
