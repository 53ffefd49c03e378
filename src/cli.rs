use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_CONF_FILE;
use crate::logging::DEFAULT_DEBUG_FILE;

#[derive(Parser, Debug)]
#[command(name = "redfish-client")]
#[command(version)]
#[command(about = "Manages lights-out management endpoints over Redfish", long_about = None)]
pub struct Cli {
    /// Configuration file holding the managers
    #[arg(
        long = "conf_file",
        visible_alias = "conf-file",
        value_name = "FILE",
        env = "REDFISH_CONF_FILE",
        default_value = DEFAULT_CONF_FILE,
        global = true
    )]
    pub conf_file: String,

    /// Ignore SSL certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Debug level from 1 to 3; levels above 1 may write passwords to the logs
    #[arg(
        long,
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(1..=3),
        global = true
    )]
    pub debug: Option<u8>,

    /// Client debug file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DEBUG_FILE, global = true)]
    pub debugfile: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Query a manager (lights-out management).
    #[command(subcommand)]
    Manager(ManagerCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Add a manager, replacing any manager with the same name.
    Add {
        /// Name of the manager
        name: String,
        /// Url of the manager
        url: String,
        login: Option<String>,
        password: Option<String>,
        /// Fail instead of replacing an existing manager
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Delete a manager.
    #[command(alias = "delete")]
    Del { name: String },
    /// Change one setting of a manager, or rename it.
    Modify {
        name: String,
        #[arg(value_enum)]
        field: ModifyTarget,
        value: String,
        /// Fail instead of replacing an existing manager when renaming
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Show manager names.
    Show,
    /// Show managers with their url and credentials.
    Showall,
}

#[derive(Subcommand, Debug)]
pub enum ManagerCommand {
    /// Display information about a manager.
    Getinfo {
        /// Name of the manager
        #[arg(default_value = "default")]
        name: String,
    },
}

/// What `config modify` changes.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifyTarget {
    Url,
    Login,
    Password,
    #[value(name = "manager_name", alias = "manager-name")]
    ManagerName,
}

impl ModifyTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifyTarget::Url => "url",
            ModifyTarget::Login => "login",
            ModifyTarget::Password => "password",
            ModifyTarget::ManagerName => "manager_name",
        }
    }
}
