//! Moodle adapter implementation
//!
//! This module provides the integration with Moodle forums: an HTTP client
//! that carries the session cookie, the [`PageFetcher`] abstraction it
//! implements, and the HTML parser for forum listings and discussions.

pub mod client;
pub mod fetcher;
pub mod parser;

pub use client::MoodleClient;
pub use fetcher::{Page, PageFetcher};
pub use parser::{ForumParser, ParseOutcome};
