//! Scrape orchestration
//!
//! This module provides the scrape workflow:
//! - Forum pagination and discussion traversal
//! - Anonymization of every scraped post
//! - Summary and reporting

pub mod coordinator;
pub mod summary;

pub use coordinator::{page_url, ScrapeCoordinator, ScrapeSettings};
pub use summary::{ScrapeError, ScrapeErrorType, ScrapeSummary};
