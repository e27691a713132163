use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the registry, picker and launch layers.
///
/// Status probes and the session name resolver never produce these; they
/// fold every failure into the negative branch of their status enum.
#[derive(Debug, Error)]
pub enum BoError {
    #[error("No project registry found at {}", .0.display())]
    RegistryNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The external program could not be found on PATH
    #[error("{0} is not installed")]
    ToolMissing(String),

    #[error("{program} did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },
}

pub type Result<T> = std::result::Result<T, BoError>;

impl BoError {
    /// Whether this error should end the process with exit code 1 and the
    /// registry setup hint.
    pub fn is_missing_registry(&self) -> bool {
        matches!(self, Self::RegistryNotFound(_))
    }
}
