//! Project registry: the persisted list of known project directories.
//!
//! Two on-disk forms exist. The plain list holds one path per line; the
//! structured registry holds one YAML document per project with precomputed
//! display fields. Every load de-duplicates and sorts the entries and, when
//! that changed anything, writes the normalized form back.

mod plain;
mod store;
mod structured;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::expand_home;
use crate::error::{BoError, Result};
use crate::tmux::basename;

pub use structured::ProjectRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Plain,
    Structured,
}

/// One registered project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEntry {
    Plain(String),
    Structured(ProjectRecord),
}

impl ProjectEntry {
    /// Path exactly as stored
    pub fn raw_path(&self) -> &str {
        match self {
            Self::Plain(raw) => raw,
            Self::Structured(record) => &record.path,
        }
    }

    /// Stored path with `~` expanded
    pub fn path(&self) -> PathBuf {
        expand_home(self.raw_path())
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Structured(ProjectRecord {
                name: Some(name), ..
            }) if !name.trim().is_empty() => name.trim().to_string(),
            _ => basename(&self.path()),
        }
    }
}

/// Entries returned by [`load`]
#[derive(Debug)]
pub struct Loaded {
    pub entries: Vec<ProjectEntry>,
    /// The store was rewritten in normalized form
    pub rewritten: bool,
}

/// Load, normalize and (if needed) rewrite the registry at `path`.
///
/// Reading needs no write access. Only a rewrite takes the registry's
/// exclusive lock, and it re-reads under the lock before writing.
pub fn load(kind: RegistryKind, path: &Path) -> Result<Loaded> {
    if !path.is_file() {
        return Err(BoError::RegistryNotFound(path.to_path_buf()));
    }

    let (raw, rewritable) = read(kind, path)?;
    let entries = normalize(raw.clone());
    if entries == raw {
        return Ok(Loaded {
            entries,
            rewritten: false,
        });
    }
    if !rewritable {
        tracing::warn!(
            "{} has unreadable documents; not rewriting it",
            path.display()
        );
        return Ok(Loaded {
            entries,
            rewritten: false,
        });
    }

    let _lock = store::lock(path)?;
    let (raw, rewritable) = read(kind, path)?;
    let entries = normalize(raw.clone());
    let rewritten = rewritable && entries != raw;
    if rewritten {
        tracing::info!("normalizing {}", path.display());
        persist(path, &entries)?;
    }

    Ok(Loaded { entries, rewritten })
}

/// Entries as stored, and whether the file may be rewritten from them
fn read(kind: RegistryKind, path: &Path) -> Result<(Vec<ProjectEntry>, bool)> {
    let text = std::fs::read_to_string(path)?;
    Ok(match kind {
        RegistryKind::Plain => {
            let entries = plain::parse(&text).into_iter().map(ProjectEntry::Plain);
            (entries.collect(), true)
        }
        RegistryKind::Structured => {
            let parsed = structured::parse(&text, &file_label(path));
            let entries = parsed.records.into_iter().map(ProjectEntry::Structured);
            (entries.collect(), parsed.failures == 0)
        }
    })
}

/// Replace the registry's contents with `entries`.
pub fn persist(path: &Path, entries: &[ProjectEntry]) -> Result<()> {
    let mut plain_paths = Vec::new();
    let mut records = Vec::new();
    for entry in entries {
        match entry {
            ProjectEntry::Plain(raw) => plain_paths.push(raw.as_str()),
            ProjectEntry::Structured(record) => records.push(record),
        }
    }

    let contents = if records.is_empty() {
        plain::render(&plain_paths)
    } else {
        structured::render(&records)?
    };
    store::write_atomic(path, &contents)
}

/// Drop entries whose path repeats an earlier one, then sort
/// case-insensitively by the stored path. The sort is stable, so the result
/// is a fixed point.
pub fn normalize(entries: Vec<ProjectEntry>) -> Vec<ProjectEntry> {
    let mut seen = HashSet::new();
    let mut unique: Vec<ProjectEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(path_key(entry.raw_path())))
        .collect();
    unique.sort_by_cached_key(|entry| entry.raw_path().to_lowercase());
    unique
}

/// Identity of a stored path: `~` expanded, trailing separators removed
fn path_key(raw: &str) -> PathBuf {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("/")
    } else {
        expand_home(trimmed)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
