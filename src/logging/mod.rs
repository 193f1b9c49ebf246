//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON log file with rotation
//! - Level from the CLI, configuration or `RUST_LOG`
//!
//! Post content and real author names are never logged; only counts, URLs
//! and placeholders appear in log events.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a forum scrape
///
/// # Example
///
/// ```no_run
/// use parley::log_scrape_start;
///
/// log_scrape_start!("https://moodle.example.com/mod/forum/view.php?id=3");
/// ```
#[macro_export]
macro_rules! log_scrape_start {
    ($forum_url:expr) => {
        tracing::info!(forum_url = %$forum_url, "Starting forum scrape");
    };
}

/// Log a scraped discussion
///
/// # Example
///
/// ```no_run
/// use parley::log_discussion_scraped;
///
/// log_discussion_scraped!("https://moodle.example.com/mod/forum/discuss.php?d=9", 4);
/// ```
#[macro_export]
macro_rules! log_discussion_scraped {
    ($url:expr, $post_count:expr) => {
        tracing::info!(
            discussion_url = %$url,
            post_count = $post_count,
            "Discussion scraped"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use parley::log_error_with_context;
/// use parley::domain::ParleyError;
///
/// let error = ParleyError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
