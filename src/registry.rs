//! The manager registry: named manager records backed by a JSON file.
//!
//! The registry never saves on its own. Callers mutate it in memory and then
//! call [`Registry::save`] once, so a read-only session never rewrites the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{RegistryError, RegistryResult};
use crate::record::{ManagerField, ManagerRecord};
use crate::storage::{self, ConfigDocument};

/// Why a load fell back to an empty registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDegradation {
    /// The backing file does not exist yet.
    Missing,
    /// The backing file exists but could not be read or parsed.
    Unreadable(String),
}

/// How the registry was obtained from its backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Degraded(LoadDegradation),
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadOutcome::Degraded(_))
    }
}

#[derive(Debug)]
pub struct Registry {
    managers: HashMap<String, ManagerRecord>,
    /// Unrecognized top-level content of the backing file.
    extra: Map<String, Value>,
    path: PathBuf,
    outcome: LoadOutcome,
}

impl Registry {
    /// Creates an empty registry bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            managers: HashMap::new(),
            extra: Map::new(),
            path: path.into(),
            outcome: LoadOutcome::Loaded,
        }
    }

    /// Loads the registry from `path`.
    ///
    /// A missing or unparsable file yields an empty registry instead of an
    /// error; the reason is kept in [`Registry::load_outcome`].
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let (document, outcome) = if !path.exists() {
            log::debug!("Configuration file {} not found", path.display());
            (
                ConfigDocument::default(),
                LoadOutcome::Degraded(LoadDegradation::Missing),
            )
        } else {
            match storage::load_document(&path) {
                Ok(document) => (document, LoadOutcome::Loaded),
                Err(e) => {
                    log::warn!(
                        "Ignoring unreadable configuration file {}: {}",
                        path.display(),
                        e
                    );
                    (
                        ConfigDocument::default(),
                        LoadOutcome::Degraded(LoadDegradation::Unreadable(e.to_string())),
                    )
                }
            }
        };

        log::debug!(
            "Loaded {} managers from {}",
            document.managers.len(),
            path.display()
        );

        Self {
            managers: document.managers,
            extra: document.extra,
            path,
            outcome,
        }
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every record to the backing file, replacing its contents.
    pub fn save(&self) -> RegistryResult<()> {
        let document = ConfigDocument {
            managers: self.managers.clone(),
            extra: self.extra.clone(),
        };
        storage::save_document(&self.path, &document).map_err(|source| {
            RegistryError::Persistence {
                path: self.path.clone(),
                source,
            }
        })?;
        log::info!(
            "Saved {} managers to {}",
            self.managers.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Returns every manager name. The order is unspecified.
    pub fn list(&self) -> Vec<&str> {
        self.managers.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.managers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> RegistryResult<&ManagerRecord> {
        self.managers
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Inserts `record` under `name`, replacing any existing record.
    pub fn add(&mut self, name: impl Into<String>, record: ManagerRecord) {
        let name = name.into();
        if self.managers.insert(name.clone(), record).is_some() {
            log::debug!("Replaced manager: {}", name);
        } else {
            log::debug!("Added manager: {}", name);
        }
    }

    /// Like [`Registry::add`] but refuses to replace an existing record.
    pub fn try_add(
        &mut self,
        name: impl Into<String>,
        record: ManagerRecord,
    ) -> RegistryResult<()> {
        let name = name.into();
        if self.managers.contains_key(&name) {
            return Err(RegistryError::AlreadyExists(name));
        }
        self.add(name, record);
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> RegistryResult<ManagerRecord> {
        let record = self
            .managers
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        log::debug!("Deleted manager: {}", name);
        Ok(record)
    }

    /// Overwrites one field of `name` given the field's textual name.
    ///
    /// The manager must exist before the field name is even considered.
    pub fn modify_field(
        &mut self,
        name: &str,
        field: &str,
        value: impl Into<String>,
    ) -> RegistryResult<()> {
        if !self.managers.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        let field: ManagerField = field.parse()?;
        self.set_field(name, field, value)
    }

    pub fn set_field(
        &mut self,
        name: &str,
        field: ManagerField,
        value: impl Into<String>,
    ) -> RegistryResult<()> {
        let record = self
            .managers
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        record.set(field, value);
        log::debug!("Modified {} of manager: {}", field, name);
        Ok(())
    }

    /// Moves the record at `old_name` to `new_name`.
    ///
    /// An existing `new_name` is replaced. Renaming a manager to itself keeps
    /// the record.
    pub fn rename(&mut self, old_name: &str, new_name: impl Into<String>) -> RegistryResult<()> {
        let new_name = new_name.into();
        let record = self
            .managers
            .remove(old_name)
            .ok_or_else(|| RegistryError::NotFound(old_name.to_string()))?;
        log::debug!("Renaming manager {} to {}", old_name, new_name);
        self.add(new_name, record);
        Ok(())
    }

    /// Like [`Registry::rename`] but refuses to replace another manager.
    pub fn try_rename(
        &mut self,
        old_name: &str,
        new_name: impl Into<String>,
    ) -> RegistryResult<()> {
        let new_name = new_name.into();
        if !self.managers.contains_key(old_name) {
            return Err(RegistryError::NotFound(old_name.to_string()));
        }
        if new_name != old_name && self.managers.contains_key(&new_name) {
            return Err(RegistryError::AlreadyExists(new_name));
        }
        self.rename(old_name, new_name)
    }

    /// Iterates over all records. The order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManagerRecord)> {
        self.managers.iter().map(|(name, record)| (name.as_str(), record))
    }
}
