use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::record::ManagerRecord;

/// On-disk layout of the configuration file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "Managers", default)]
    pub managers: HashMap<String, ManagerRecord>,
    /// Top-level keys other than `Managers`, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads and parses the configuration file.
///
/// Callers that want first-run behavior should treat any error as an empty
/// document; see [`crate::registry::Registry::load`].
pub fn load_document(path: &Path) -> Result<ConfigDocument> {
    let file_content = fs::read_to_string(path)?;
    if file_content.trim().is_empty() {
        return Err(anyhow!("Configuration file is empty"));
    }
    let document: ConfigDocument = serde_json::from_str(&file_content)?;
    Ok(document)
}

/// Writes the whole document, replacing the previous file contents.
pub fn save_document(path: &Path, document: &ConfigDocument) -> io::Result<()> {
    let json = serde_json::to_string_pretty(document).map_err(io::Error::other)?;
    fs::write(path, json)
}
