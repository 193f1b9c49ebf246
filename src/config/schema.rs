//! Configuration schema types
//!
//! This module defines the configuration structure for Parley. Every section
//! has defaults so an empty file (or no file at all) is a valid configuration;
//! the session cookie, tracked author and forum URLs can then be supplied on
//! the command line or interactively.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text report
    #[default]
    Text,
    /// JSON document
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Invalid output format '{other}'. Must be one of: text, json"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Main Parley configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Moodle connection settings
    #[serde(default)]
    pub moodle: MoodleConfig,

    /// Author anonymization settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ParleyConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.moodle.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Moodle connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodleConfig {
    /// Value of the `MoodleSession` cookie
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub session: Option<SecretString>,

    /// Forum URLs to scrape, e.g. `https://moodle.example.com/mod/forum/view.php?id=42`
    #[serde(default)]
    pub forum_urls: Vec<String>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Pause between discussion requests in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Maximum forum listing pages to visit per forum (unbounded when unset)
    #[serde(default)]
    pub max_pages: Option<usize>,
}

impl MoodleConfig {
    fn validate(&self) -> Result<(), String> {
        if self.user_agent.trim().is_empty() {
            return Err("moodle.user_agent cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("moodle.timeout_seconds must be > 0".to_string());
        }

        if self.max_pages == Some(0) {
            return Err("moodle.max_pages must be > 0 when set".to_string());
        }

        for url in &self.forum_urls {
            if !is_http_url(url) {
                return Err(format!(
                    "moodle.forum_urls entry '{url}' must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }
}

impl Default for MoodleConfig {
    fn default() -> Self {
        Self {
            session: None,
            forum_urls: Vec::new(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
            request_delay_ms: default_request_delay_ms(),
            max_pages: None,
        }
    }
}

/// Author anonymization configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Name of the author whose posts become "User"
    #[serde(default)]
    pub tracked_author: Option<String>,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the report is written to (created if missing)
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Report file name inside `directory`
    #[serde(default = "default_output_file_name")]
    pub file_name: String,

    /// Report format
    #[serde(default)]
    pub format: OutputFormat,
}

impl OutputConfig {
    /// Full path of the report file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    fn validate(&self) -> Result<(), String> {
        if self.file_name.trim().is_empty() {
            return Err("output.file_name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_name: default_output_file_name(),
            format: OutputFormat::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Whether `url` starts with an http or https scheme
pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("outputdata")
}

fn default_output_file_name() -> String {
    "foro_exportado.txt".to_string()
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
