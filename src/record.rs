//! Manager records as stored in the registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RegistryError;

/// Connection settings of a single named manager.
///
/// An empty `login` means no credentials are configured and the manager is
/// reached in anonymous (simulated) mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerRecord {
    pub url: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    /// Fields this tool does not know about, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManagerRecord {
    /// Creates a record, normalizing omitted credentials to empty strings.
    pub fn new(url: impl Into<String>, login: Option<String>, password: Option<String>) -> Self {
        Self {
            url: url.into(),
            login: login.unwrap_or_default(),
            password: password.unwrap_or_default(),
            extra: Map::new(),
        }
    }

    /// Whether a login is configured. Without one the manager is contacted
    /// anonymously.
    pub fn has_credentials(&self) -> bool {
        !self.login.is_empty()
    }

    /// Overwrites a single field, leaving the others untouched.
    pub fn set(&mut self, field: ManagerField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ManagerField::Url => self.url = value,
            ManagerField::Login => self.login = value,
            ManagerField::Password => self.password = value,
        }
    }
}

/// The editable fields of a [`ManagerRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerField {
    Url,
    Login,
    Password,
}

impl ManagerField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerField::Url => "url",
            ManagerField::Login => "login",
            ManagerField::Password => "password",
        }
    }
}

impl fmt::Display for ManagerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManagerField {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(ManagerField::Url),
            "login" => Ok(ManagerField::Login),
            "password" => Ok(ManagerField::Password),
            other => Err(RegistryError::InvalidField(other.to_string())),
        }
    }
}
