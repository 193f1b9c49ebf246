//! Core business logic for Parley.
//!
//! This module contains the orchestration of a scrape run and the report
//! output.
//!
//! # Modules
//!
//! - [`scrape`] - Forum pagination, discussion traversal and anonymization
//! - [`output`] - Text and JSON report writing
//!
//! # Scrape Workflow
//!
//! 1. **Fetch listing**: Load `<forum>&page=N` for N = 0, 1, ...
//! 2. **Collect links**: Extract discussion URLs from each listing page
//! 3. **Fetch discussions**: Load each discussion, pausing between requests
//! 4. **Anonymize**: Replace every author with `User` or `Developer`
//! 5. **Report**: Write all discussions to a single file
//!
//! # Example
//!
//! ```rust,no_run
//! use parley::anonymization::AuthorAnonymizer;
//! use parley::config::load_config;
//! use parley::core::output::ReportWriter;
//! use parley::core::scrape::ScrapeCoordinator;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("parley.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let anonymizer = AuthorAnonymizer::new("Jane Doe");
//! let coordinator = ScrapeCoordinator::from_config(&config, anonymizer, shutdown_rx)?;
//!
//! let forum = Url::parse("https://moodle.example.com/mod/forum/view.php?id=3")?;
//! let summary = coordinator.run(&[forum]).await;
//!
//! ReportWriter::from_config(&config.output)
//!     .write(&summary.discussions, summary.stats.tracked_author_seen())?;
//! println!("Posts: {}", summary.total_posts());
//! # Ok(())
//! # }
//! ```

pub mod output;
pub mod scrape;
