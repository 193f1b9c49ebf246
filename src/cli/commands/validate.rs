//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Parley configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after applying environment overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Session Cookie: {}",
            if config.moodle.session.is_some() {
                "set"
            } else {
                "not set (will be prompted)"
            }
        );
        println!(
            "  Tracked Author: {}",
            if config.anonymization.tracked_author.is_some() {
                "set"
            } else {
                "not set (will be prompted)"
            }
        );
        println!("  Forum URLs: {:?}", config.moodle.forum_urls);
        println!("  Request Delay: {}ms", config.moodle.request_delay_ms);
        println!(
            "  Max Pages: {}",
            config
                .moodle
                .max_pages
                .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
        );
        println!("  Output: {} ({})", config.output.path().display(), config.output.format);
        println!();
        Ok(0)
    }
}
