use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::Result;

/// One document of the structured registry.
///
/// Status fields are snapshots written by whoever last refreshed the
/// registry; they are displayed as-is. A rewrite emits the document exactly
/// as it was read, so keys not listed here survive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(deserialize_with = "required_text")]
    pub path: String,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "git status",
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub git_status: Option<String>,
    #[serde(
        rename = "github status",
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_status: Option<String>,
    #[serde(
        rename = "github remote",
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_remote: Option<String>,
    #[serde(
        rename = "github remote url",
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_remote_url: Option<String>,
    #[serde(
        rename = "tmux status",
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub tmux_status: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(
        rename = "build system",
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub build_system: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip)]
    document: Option<Value>,
}

impl ProjectRecord {
    #[cfg(test)]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            git_status: None,
            github_status: None,
            github_remote: None,
            github_remote_url: None,
            tmux_status: None,
            language: None,
            framework: None,
            build_system: None,
            interface: None,
            document: None,
        }
    }
}

/// Result of reading a structured registry
#[derive(Debug, Default)]
pub struct Parsed {
    pub records: Vec<ProjectRecord>,
    /// Documents that could not be read; the registry must not be rewritten
    /// while any exist, or they would be lost.
    pub failures: usize,
}

/// Read every document, skipping (and logging) the ones that are malformed.
///
/// A YAML syntax error ends the read, since the document boundaries after it
/// cannot be trusted.
pub fn parse(text: &str, label: &str) -> Parsed {
    let mut parsed = Parsed::default();

    for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let value = match Value::deserialize(document) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("{}: document {}: {}", label, index + 1, e);
                parsed.failures += 1;
                break;
            }
        };
        if value.is_null() {
            continue;
        }
        match serde_yaml::from_value::<ProjectRecord>(value.clone()) {
            Ok(record) => parsed.records.push(ProjectRecord {
                document: Some(value),
                ..record
            }),
            Err(e) => {
                tracing::warn!("{}: skipping document {}: {}", label, index + 1, e);
                parsed.failures += 1;
            }
        }
    }

    parsed
}

pub fn render(records: &[&ProjectRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str("---\n");
        let yaml = match &record.document {
            Some(document) => serde_yaml::to_string(document)?,
            None => serde_yaml::to_string(record)?,
        };
        out.push_str(&yaml);
    }
    Ok(out)
}

/// Accept any scalar and keep its textual form
fn text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn required_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match text(deserializer)? {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(serde::de::Error::custom("`path` must be a non-empty string")),
    }
}
