//! Executes one parsed command against the registry.
//!
//! The dispatcher never saves. It reports through [`CommandOutput::modified`]
//! whether the registry changed, and the caller persists it once.

use anyhow::{Context, Result};

use crate::cli::{Commands, ConfigCommand, ManagerCommand, ModifyTarget};
use crate::connection::ConnectionParams;
use crate::record::ManagerRecord;
use crate::redfish::RemoteManagement;
use crate::registry::Registry;
use crate::render;

/// Options shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Disable certificate verification for remote sessions.
    pub insecure: bool,
}

/// Result of a successfully executed command.
#[derive(Debug, Default)]
pub struct CommandOutput {
    /// Text to show the user.
    pub message: Option<String>,
    /// The registry was mutated and must be saved.
    pub modified: bool,
}

impl CommandOutput {
    fn show(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            modified: false,
        }
    }

    fn mutated(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            modified: true,
        }
    }
}

pub fn execute<R: RemoteManagement>(
    command: Commands,
    registry: &mut Registry,
    remote: &R,
    options: RunOptions,
) -> Result<CommandOutput> {
    match command {
        Commands::Config(command) => execute_config(command, registry),
        Commands::Manager(ManagerCommand::Getinfo { name }) => {
            log::debug!("getinfo command");
            get_manager_info(&name, registry, remote, options)
        }
    }
}

fn execute_config(command: ConfigCommand, registry: &mut Registry) -> Result<CommandOutput> {
    match command {
        ConfigCommand::Show => {
            log::debug!("show command");
            Ok(CommandOutput::show(render::managers(registry, false)))
        }
        ConfigCommand::Showall => {
            log::debug!("showall command");
            Ok(CommandOutput::show(render::managers(registry, true)))
        }
        ConfigCommand::Add {
            name,
            url,
            login,
            password,
            no_overwrite,
        } => {
            log::debug!("add command");
            let record = ManagerRecord::new(url, login, password);
            if no_overwrite {
                registry.try_add(name.clone(), record)?;
            } else {
                registry.add(name.clone(), record);
            }
            log::info!("Added manager: {}", name);
            Ok(CommandOutput::mutated(format!("Added '{}'", name)))
        }
        ConfigCommand::Del { name } => {
            log::debug!("del command");
            registry.delete(&name)?;
            log::info!("Deleted manager: {}", name);
            Ok(CommandOutput::mutated(format!("Deleted '{}'", name)))
        }
        ConfigCommand::Modify {
            name,
            field,
            value,
            no_overwrite,
        } => {
            log::debug!("modify command");
            match field {
                ModifyTarget::ManagerName => {
                    if no_overwrite {
                        registry.try_rename(&name, value.clone())?;
                    } else {
                        registry.rename(&name, value.clone())?;
                    }
                    log::info!("Renamed manager {} to {}", name, value);
                    Ok(CommandOutput::mutated(format!(
                        "Renamed '{}' to '{}'",
                        name, value
                    )))
                }
                target => {
                    registry.modify_field(&name, target.as_str(), value)?;
                    log::info!("Modified {} of manager: {}", target.as_str(), name);
                    Ok(CommandOutput::mutated(format!(
                        "Modified {} of '{}'",
                        target.as_str(),
                        name
                    )))
                }
            }
        }
    }
}

fn get_manager_info<R: RemoteManagement>(
    name: &str,
    registry: &Registry,
    remote: &R,
    options: RunOptions,
) -> Result<CommandOutput> {
    let record = registry.get(name)?;
    let params = ConnectionParams::resolve(record, options.insecure);
    log::debug!(
        "Connecting to {} in {:?} mode (verify certificates: {})",
        params.url,
        params.mode,
        params.verify_certificates
    );

    eprintln!("Gathering data from manager, please wait...");
    log::info!("Gathering data from manager");
    let snapshot = remote
        .fetch(&params)
        .with_context(|| format!("Unable to get information from manager '{}'", name))?;

    Ok(CommandOutput::show(render::snapshot(name, &snapshot)))
}
