use std::path::{Path, PathBuf};

use serde_yaml::Value;

/// Keys that may carry an explicit session name, in lookup order
const SESSION_NAME_KEYS: [&str; 2] = ["session_name", "session-name"];

/// Locate the project's session descriptor (`<stem>.yaml`, then `<stem>.yml`).
pub fn find_descriptor(project: &Path, stem: &str) -> Option<PathBuf> {
    ["yaml", "yml"]
        .iter()
        .map(|ext| project.join(format!("{}.{}", stem, ext)))
        .find(|candidate| candidate.is_file())
}

/// Canonical session name for a project.
///
/// Uses the descriptor's explicit name when there is one, otherwise the
/// directory's base name. Never fails.
pub fn resolve_session_name(project: &Path, stem: &str) -> String {
    find_descriptor(project, stem)
        .and_then(|descriptor| name_from_descriptor(&descriptor))
        .unwrap_or_else(|| basename(project))
}

/// Session name declared inside a descriptor file, if any.
pub fn name_from_descriptor(descriptor: &Path) -> Option<String> {
    let text = match std::fs::read_to_string(descriptor) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", descriptor.display(), e);
            return None;
        }
    };

    let document: Value = match serde_yaml::from_str(&text) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("error parsing {}: {}", file_label(descriptor), e);
            return None;
        }
    };

    let mapping = document.as_mapping()?;
    SESSION_NAME_KEYS
        .iter()
        .filter_map(|key| mapping.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

/// Final path segment, or the whole path when there is none (e.g. `/`)
pub fn basename(project: &Path) -> String {
    project
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| project.display().to_string())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
