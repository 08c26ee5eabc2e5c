//! Configuration and CLI argument handling

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "take-five")]
#[command(about = "A state-managed HTTP server for Pomodoro work/break cycling")]
#[command(version = "1.1.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "29170")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Path to the settings file (defaults to the user config directory)
    #[arg(short, long)]
    pub settings_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the settings file location, honoring the CLI override
    pub fn settings_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.settings_file {
            return Ok(path.clone());
        }
        let config_dir = dirs::config_dir().context("could not determine the user config directory")?;
        Ok(config_dir.join("take-five").join("settings.json"))
    }
}
