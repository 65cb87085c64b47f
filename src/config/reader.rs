use super::ConfigDocument;
use anyhow::Context;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// What was found at a target's configuration path.
#[derive(Debug, Clone, PartialEq)]
pub enum ExistingDocument {
    /// No file at the path.
    Absent,
    Parsed(ConfigDocument),
    /// The file exists but is not a JSON object. Carries the parse failure.
    Malformed(String),
}

impl ExistingDocument {
    /// Whether a file exists on disk and therefore needs a backup.
    pub const fn exists(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// The document to merge into. Malformed input counts as empty.
    pub fn into_document(self) -> Option<ConfigDocument> {
        match self {
            Self::Parsed(document) => Some(document),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}

/// Parse settings file contents, tolerating anything that is not a JSON object.
pub fn parse_config_document(content: &str) -> ExistingDocument {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(object)) => ExistingDocument::Parsed(ConfigDocument::from_object(object)),
        Ok(other) => ExistingDocument::Malformed(format!(
            "expected a JSON object at the top level, found {}",
            json_type_name(&other)
        )),
        Err(e) => ExistingDocument::Malformed(e.to_string()),
    }
}

/// Read a target's settings file.
///
/// # Errors
///
/// Returns an error only if the file exists but cannot be read. Invalid JSON
/// is reported as [`ExistingDocument::Malformed`].
pub fn read_config_document<P: AsRef<Path>>(path: P) -> anyhow::Result<ExistingDocument> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Ok(ExistingDocument::Absent);
    }

    let content = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read {}", path_ref.display()))?;

    Ok(parse_config_document(&content))
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
