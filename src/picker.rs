//! External fuzzy picker and resolution of its answer back to a path.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::{expand_home, PickerConfig};
use crate::error::{BoError, Result};
use crate::listing::GUTTER;

/// CSI escape sequences (colors, cursor movement)
static RE_ANSI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap());

/// A line-in, line-out selection filter
#[allow(async_fn_in_trait)]
pub trait Picker {
    /// Offer `lines` and return the chosen one, or `None` when the user
    /// cancelled.
    async fn pick(&self, lines: &[String]) -> Result<Option<String>>;
}

/// fzf with a reversed, partial-height layout and ANSI passthrough
pub struct FzfPicker {
    config: PickerConfig,
}

impl FzfPicker {
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn args(&self) -> Vec<String> {
        vec![
            "--ansi".to_string(),
            format!("--prompt={}", self.config.prompt),
            format!("--height={}", self.config.height),
            "--reverse".to_string(),
        ]
    }
}

impl Picker for FzfPicker {
    async fn pick(&self, lines: &[String]) -> Result<Option<String>> {
        let mut child = Command::new(&self.config.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => BoError::ToolMissing(self.config.program.clone()),
                _ => BoError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = lines.join("\n");
            match stdin.write_all(input.as_bytes()).await {
                Ok(()) => {}
                // The user may pick before fzf has read everything
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            tracing::debug!("{} exited with {}", self.config.program, output.status);
            return Ok(None);
        }

        let selection = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!selection.is_empty()).then_some(selection))
    }
}

/// Recover the project path from a picked listing line.
///
/// The path is the text after the last column gutter (the whole line when
/// there is none), so a path containing a run of four spaces resolves to
/// its tail. `~` is expanded and the result made absolute with
/// symlinks resolved. Blank input means nothing was picked.
pub fn resolve_selection(raw: &str) -> Option<PathBuf> {
    let line = RE_ANSI.replace_all(raw.trim(), "");
    let raw_path = line.rsplit(GUTTER).next()?.trim();
    if raw_path.is_empty() {
        return None;
    }
    Some(absolute(&expand_home(raw_path)))
}

fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
