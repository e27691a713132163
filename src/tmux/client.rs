use std::path::Path;

use crate::config::MultiplexerConfig;
use crate::runner::CommandRunner;

/// Client for interacting with tmux (and its descriptor loader) via CLI
pub struct TmuxClient {
    /// Path to tmux binary
    tmux_path: String,
    /// Path to the descriptor loader (tmuxp)
    loader_path: String,
}

impl TmuxClient {
    pub fn new(config: &MultiplexerConfig) -> Self {
        Self {
            tmux_path: config.program.clone(),
            loader_path: config.loader.clone(),
        }
    }

    /// Check whether a session with exactly this name is running.
    ///
    /// A missing tmux binary or server counts as "no session".
    pub async fn has_session(&self, runner: &impl CommandRunner, name: &str) -> bool {
        let target = exact_target(name);
        match runner
            .run(&self.tmux_path, &["has-session", "-t", &target])
            .await
        {
            Ok(output) => output.success,
            Err(e) => {
                tracing::debug!("tmux has-session {} failed: {}", name, e);
                false
            }
        }
    }

    /// Get the command to attach to a session (for external execution)
    pub fn attach_command(&self, name: &str) -> Vec<String> {
        vec![
            self.tmux_path.clone(),
            "attach-session".to_string(),
            "-t".to_string(),
            exact_target(name),
        ]
    }

    /// Get the command to move the current client to a session
    pub fn switch_command(&self, name: &str) -> Vec<String> {
        vec![
            self.tmux_path.clone(),
            "switch-client".to_string(),
            "-t".to_string(),
            exact_target(name),
        ]
    }

    /// Get the command that builds a session from a descriptor file.
    ///
    /// Inside a client the loader would otherwise prompt before switching.
    pub fn load_command(&self, descriptor: &Path, inside_client: bool) -> Vec<String> {
        let mut cmd = vec![self.loader_path.clone(), "load".to_string()];
        if inside_client {
            cmd.push("--yes".to_string());
        }
        cmd.push(descriptor.display().to_string());
        cmd
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new(&MultiplexerConfig::default())
    }
}

/// `=name` makes tmux match the session name exactly instead of by prefix
fn exact_target(name: &str) -> String {
    format!("={}", name)
}
