//! User configuration, loaded from `~/.config/bo/config.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Environment variable that points at an alternate config file
pub const CONFIG_ENV: &str = "BO_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plain-list registry, one project path per line
    pub registry: String,
    /// Structured registry, one YAML document per project
    pub structured_registry: String,
    /// Remote URLs containing this domain count as hosted
    pub hosting_domain: String,
    /// Style listing glyphs with ANSI colors
    pub color: bool,
    pub probe: ProbeConfig,
    pub picker: PickerConfig,
    pub multiplexer: MultiplexerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
    /// Projects probed at the same time
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub program: String,
    pub prompt: String,
    pub height: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MultiplexerConfig {
    pub program: String,
    /// Tool that builds a session from a descriptor file
    pub loader: String,
    /// Set by the multiplexer inside its clients
    pub inside_env: String,
    /// Descriptor file name without extension
    pub descriptor_stem: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: "~/.config/bo/projects.txt".to_string(),
            structured_registry: "~/.config/bo/bo-registry.yaml".to_string(),
            hosting_domain: "github.com".to_string(),
            color: true,
            probe: ProbeConfig::default(),
            picker: PickerConfig::default(),
            multiplexer: MultiplexerConfig::default(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 3,
            concurrency: 8,
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            program: "fzf".to_string(),
            prompt: "Select project > ".to_string(),
            height: "60%".to_string(),
        }
    }
}

impl Default for MultiplexerConfig {
    fn default() -> Self {
        Self {
            program: "tmux".to_string(),
            loader: "tmuxp".to_string(),
            inside_env: "TMUX".to_string(),
            descriptor_stem: ".tmuxp".to_string(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is absent or
    /// unreadable.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn registry_path(&self) -> PathBuf {
        expand_home(&self.registry)
    }

    pub fn structured_registry_path(&self) -> PathBuf {
        expand_home(&self.structured_registry)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_secs.max(1))
    }
}

fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("bo")
        .join("config.toml")
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(raw);
    };
    if raw == "~" {
        home
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}
