//! Logging infrastructure for redfish-client.
//!
//! This module provides file logging with timestamps, an optional terminal
//! logger, and the mapping from the `--debug` level to log filters.

use anyhow::{Result, anyhow};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const DEFAULT_DEBUG_FILE: &str = "redfish-client.log";

/// Targets of the HTTP stack, only logged at debug level 3.
const HTTP_TARGETS: &[&str] = &["reqwest", "hyper", "hyper_util", "h2", "rustls", "httpmock"];

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Path to the log file.
    pub path: PathBuf,
    /// Minimum level written to the log file.
    pub level: LevelFilter,
    /// Minimum level written to the terminal.
    pub term_level: LevelFilter,
    /// Also record HTTP stack internals.
    pub http_trace: bool,
    /// Maximum log file size in bytes before rotation (0 = no limit).
    pub max_size: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DEBUG_FILE),
            level: LevelFilter::Info,
            term_level: LevelFilter::Off,
            http_trace: false,
            max_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl LogConfig {
    /// Creates a new LogConfig with the specified path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Applies a `--debug` level.
    ///
    /// 1 logs the client at debug level, 2 adds trace output (which may
    /// contain credentials), 3 adds the HTTP stack.
    pub fn with_debug_level(mut self, debug: Option<u8>) -> Self {
        match debug {
            None | Some(0) => {}
            Some(1) => {
                self.level = LevelFilter::Debug;
                self.term_level = LevelFilter::Debug;
            }
            Some(2) => {
                self.level = LevelFilter::Trace;
                self.term_level = LevelFilter::Debug;
            }
            Some(_) => {
                self.level = LevelFilter::Trace;
                self.term_level = LevelFilter::Debug;
                self.http_trace = true;
            }
        }
        self
    }

    fn logger_config(&self, builder: &mut ConfigBuilder) -> Config {
        if !self.http_trace {
            for target in HTTP_TARGETS {
                builder.add_filter_ignore_str(*target);
            }
        }
        builder.build()
    }
}

/// Initializes the logging system with the given configuration.
///
/// This sets up a combined logger that writes to both:
/// - Log file (at the configured level, with timestamps)
/// - Terminal on stderr, only with `--debug` and when one is attached
pub fn init_logging(config: &LogConfig) -> Result<()> {
    // Ensure the parent directory exists
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Check if we need to rotate the log file
    if config.max_size > 0 && config.path.exists() {
        if let Ok(metadata) = std::fs::metadata(&config.path) {
            if metadata.len() > config.max_size {
                rotate_log(&config.path)?;
            }
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)
        .map_err(|e| anyhow!("Failed to open log file {}: {}", config.path.display(), e))?;

    let file_config = config.logger_config(
        ConfigBuilder::new()
            .set_time_format_rfc3339()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Debug),
    );

    let term_config = config.logger_config(
        ConfigBuilder::new()
            .set_time_level(LevelFilter::Off) // No timestamps in terminal
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off),
    );

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![];
    loggers.push(WriteLogger::new(config.level, file_config, log_file));

    if config.term_level != LevelFilter::Off && atty_check() {
        loggers.push(TermLogger::new(
            config.term_level,
            term_config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    log::debug!("Logging initialized at level {:?}", config.level);
    log::debug!("Log file: {}", config.path.display());

    Ok(())
}

/// Simple check if stderr is a TTY.
fn atty_check() -> bool {
    std::env::var("TERM").is_ok()
}

/// Rotates the log file by renaming it with a timestamp suffix.
fn rotate_log(path: &Path) -> Result<()> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let rotated_name = format!(
        "{}.{}",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_DEBUG_FILE),
        timestamp
    );

    let rotated_path = path.with_file_name(rotated_name);
    std::fs::rename(path, &rotated_path)?;

    log::info!("Rotated log file to: {}", rotated_path.display());
    Ok(())
}
