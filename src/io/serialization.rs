// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Guide document export and import.
//!
//! Dumping the in-memory document to a file and loading one back is how a
//! guide is inspected or patched by hand outside the editor.

use crate::models::guide::Guide;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Export guide to YAML format.
pub fn export_yaml(guide: &Guide, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(guide)?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export guide to JSON format.
pub fn export_json(guide: &Guide, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(guide)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import guide from YAML format.
pub fn import_yaml(path: &Path) -> Result<Guide> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let guide = serde_yaml::from_str(&yaml)?;
    Ok(guide)
}

/// Import guide from JSON format.
pub fn import_json(path: &Path) -> Result<Guide> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let guide = serde_json::from_str(&json)?;
    Ok(guide)
}

/// Export using the format named by the file extension.
pub fn export_by_extension(guide: &Guide, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(guide, path),
        Some("json") => export_json(guide, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Import using the format named by the file extension.
pub fn import_by_extension(path: &Path) -> Result<Guide> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}
