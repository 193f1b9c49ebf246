//! External system integrations for Parley.
//!
//! - [`moodle`] - Moodle forum fetching and parsing
//!
//! Adapters isolate external dependencies (HTTP, HTML) from the anonymization
//! core. The scrape coordinator talks to them through the
//! [`PageFetcher`](moodle::PageFetcher) trait so tests can serve canned pages.

pub mod moodle;
