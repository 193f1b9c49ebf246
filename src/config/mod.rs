//! Configuration management for Parley.
//!
//! Parley reads an optional TOML file (`parley.toml` by default) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PARLEY_*` environment overrides and `OUT_FILE` for the report name
//! - Default values for every setting
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [moodle]
//! session = "${PARLEY_MOODLE_SESSION}"
//! forum_urls = ["https://moodle.example.com/mod/forum/view.php?id=42"]
//! request_delay_ms = 1000
//!
//! [anonymization]
//! tracked_author = "Tomas Bañales Gutierrez"
//!
//! [output]
//! directory = "outputdata"
//! file_name = "foro_exportado.txt"
//! format = "text"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("parley.toml")?;
//! println!("Forums: {:?}", config.moodle.forum_urls);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default};
pub use schema::{
    is_http_url, AnonymizationConfig, ApplicationConfig, LoggingConfig, MoodleConfig,
    OutputConfig, OutputFormat, ParleyConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
