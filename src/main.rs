use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use redfish_client::cli::Cli;
use redfish_client::commands::{self, RunOptions};
use redfish_client::config;
use redfish_client::logging::{LogConfig, init_logging};
use redfish_client::redfish::{RedfishClient, RedfishError};
use redfish_client::registry::Registry;

fn run(cli: Cli) -> Result<()> {
    let conf_path = config::resolve_conf_path(&cli.conf_file)?;
    log::debug!("Configuration file: {}", conf_path.display());

    let mut registry = Registry::load(conf_path);
    log::trace!("Registry: {:?}", registry);

    let options = RunOptions {
        insecure: cli.insecure,
    };
    let output = commands::execute(cli.command, &mut registry, &RedfishClient::new(), options)?;

    if output.modified {
        log::trace!("Registry: {:?}", registry);
        registry.save()?;
    }

    if let Some(message) = output.message {
        println!("{}", message);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::new(cli.debugfile.clone()).with_debug_level(cli.debug);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: {:#}", e);
    }

    log::info!("*** Starting redfish-client {} ***", env!("CARGO_PKG_VERSION"));
    log::trace!("Arguments: {:?}", cli);

    match run(cli) {
        Ok(()) => {
            log::info!("Client session terminated");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(remote) = e.downcast_ref::<RedfishError>() {
                eprintln!("{}", remote.advice());
            }
            ExitCode::from(1)
        }
    }
}
