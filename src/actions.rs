use std::path::PathBuf;

/// What to do with a selected project. Exactly one is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No session descriptor: hand the path to the caller
    PrintPath(PathBuf),
    /// Session running, caller outside tmux
    Attach(String),
    /// Session running, caller already inside a tmux client
    Switch(String),
    /// No session yet: build it from the descriptor
    Load {
        descriptor: PathBuf,
        inside_client: bool,
    },
}
