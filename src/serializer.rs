//! Serialization of an assembled [`Specification`] to JSON or YAML.

use crate::model::Specification;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a specification to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(spec: &Specification) -> Result<String> {
    debug!("Serializing specification to YAML");
    serde_yaml::to_string(spec).context("Failed to serialize specification to YAML")
}

/// Serializes a specification to indented JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(spec: &Specification) -> Result<String> {
    debug!("Serializing specification to JSON");
    serde_json::to_string_pretty(spec).context("Failed to serialize specification to JSON")
}

/// Serializes a specification to single-line JSON.
pub fn serialize_json_compact(spec: &Specification) -> Result<String> {
    debug!("Serializing specification to compact JSON");
    serde_json::to_string(spec).context("Failed to serialize specification to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be created or written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
