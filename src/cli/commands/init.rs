//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "parley.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Parley configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your forum URLs", self.output);
                println!("  2. Create a .env file with PARLEY_MOODLE_SESSION set to your");
                println!("     MoodleSession cookie (copy it from the browser after logging in)");
                println!("  3. Validate configuration: parley validate-config");
                println!("  4. Run: parley scrape");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Parley Configuration File
# Moodle forum scraper with author anonymization

[application]
log_level = "info"

[moodle]
session = "${PARLEY_MOODLE_SESSION}"
forum_urls = ["https://moodle.example.com/mod/forum/view.php?id=1"]
request_delay_ms = 1000

[anonymization]
# tracked_author = "Your Name"

[output]
directory = "outputdata"
file_name = "foro_exportado.txt"
format = "text"

[logging]
local_enabled = true
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Parley Configuration File
# Moodle forum scraper with author anonymization
#
# Every setting has a default. Values missing here can be passed on the
# command line or entered when prompted.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Moodle Settings
# ============================================================================
[moodle]
# Value of the MoodleSession cookie from a logged-in browser session.
# Keep it out of this file; reference an environment variable instead.
session = "${PARLEY_MOODLE_SESSION}"

# Forum pages to scrape (mod/forum/view.php?id=...)
forum_urls = [
    "https://moodle.example.com/mod/forum/view.php?id=1",
]

# User-Agent sent with every request
# user_agent = "Mozilla/5.0 ..."

# Request timeout in seconds
timeout_seconds = 30

# Pause after each discussion request, in milliseconds
request_delay_ms = 1000

# Maximum listing pages per forum (omit for no limit)
# max_pages = 10

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Your name exactly as Moodle shows it. Your posts are labelled "User",
# everyone else's "Developer". Matching is exact and case-sensitive.
# tracked_author = "Your Name"

# ============================================================================
# Output
# ============================================================================
[output]
# Directory for the report (created if missing)
directory = "outputdata"

# Report file name (the OUT_FILE environment variable overrides it)
file_name = "foro_exportado.txt"

# Report format: text or json
format = "text"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON log file
local_enabled = true

# Local log directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
