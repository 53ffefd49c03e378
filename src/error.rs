//! Error types for the manager registry.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The referenced manager name is not in the registry.
    #[error("Invalid manager name: {0}")]
    NotFound(String),

    /// A modify target outside of url / login / password.
    #[error("Invalid manager field: {0}")]
    InvalidField(String),

    /// Returned by the strict (no-overwrite) operations only.
    #[error("Manager '{0}' already exists")]
    AlreadyExists(String),

    #[error("Failed to save configuration file {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
