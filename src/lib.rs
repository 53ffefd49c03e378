//! Redfish client - manage lights-out management endpoints.
//!
//! This library provides the manager registry persisted in a JSON
//! configuration file, the resolution of connection parameters for a
//! manager, and a small blocking Redfish client to query it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod record;
pub mod redfish;
pub mod registry;
pub mod render;
pub mod storage;

// Re-export commonly used types
pub use connection::{ConnectionParams, SessionMode};
pub use error::RegistryError;
pub use logging::{LogConfig, init_logging};
pub use record::{ManagerField, ManagerRecord};
pub use redfish::{RedfishClient, RemoteManagement};
pub use registry::{LoadDegradation, LoadOutcome, Registry};
