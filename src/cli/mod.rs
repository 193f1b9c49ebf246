//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Parley using clap.

pub mod commands;
pub mod prompt;

use clap::{Parser, Subcommand};

/// Parley - Moodle forum scraper with author anonymization
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
#[command(author = "Parley Contributors")]
pub struct Cli {
    /// Path to configuration file (optional for scrape)
    #[arg(short, long, default_value = "parley.toml", env = "PARLEY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PARLEY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape forums and write an anonymized report
    Scrape(commands::scrape::ScrapeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
