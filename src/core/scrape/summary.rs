//! Scrape summary and reporting
//!
//! This module defines structures for tracking the results of a scrape run.

use crate::anonymization::AnonymizationStats;
use crate::domain::Discussion;
use std::time::Duration;

/// Summary of a scrape run
#[derive(Debug, Clone, Default)]
pub struct ScrapeSummary {
    /// Number of forums processed
    pub total_forums: usize,

    /// Number of forum listing pages fetched
    pub pages_visited: usize,

    /// Post containers skipped because of missing elements
    pub skipped_posts: usize,

    /// Anonymized discussions, in first-seen order
    pub discussions: Vec<Discussion>,

    /// Placeholder counts over all posts
    pub stats: AnonymizationStats,

    /// Errors encountered during the run
    pub errors: Vec<ScrapeError>,

    /// Duration of the run
    pub duration: Duration,

    /// Whether the run stopped early because of a shutdown signal
    pub interrupted: bool,
}

impl ScrapeSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total number of discussions kept
    pub fn total_discussions(&self) -> usize {
        self.discussions.len()
    }

    /// Total number of posts over all discussions
    pub fn total_posts(&self) -> usize {
        self.discussions.iter().map(Discussion::post_count).sum()
    }

    /// Add a discussion
    ///
    /// A discussion whose URL was already recorded replaces the earlier one at
    /// its original position.
    pub fn add_discussion(&mut self, discussion: Discussion) {
        match self.discussions.iter_mut().find(|d| d.url == discussion.url) {
            Some(existing) => *existing = discussion,
            None => self.discussions.push(discussion),
        }
    }

    /// Add an error
    pub fn add_error(&mut self, error: ScrapeError) {
        self.errors.push(error);
    }

    /// Fold the results of one forum into this summary
    pub fn merge(&mut self, other: ScrapeSummary) {
        self.total_forums += other.total_forums;
        self.pages_visited += other.pages_visited;
        self.skipped_posts += other.skipped_posts;
        self.stats.merge(&other.stats);
        self.interrupted |= other.interrupted;
        self.errors.extend(other.errors);
        for discussion in other.discussions {
            self.add_discussion(discussion);
        }
    }

    /// Whether any discussion was scraped
    pub fn has_discussions(&self) -> bool {
        !self.discussions.is_empty()
    }

    /// Whether the session cookie was rejected during the run
    pub fn session_rejected(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.error_type == ScrapeErrorType::Session)
    }

    /// Check if the run completed without errors
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_forums = self.total_forums,
            total_discussions = self.total_discussions(),
            total_posts = self.total_posts(),
            skipped_posts = self.skipped_posts,
            pages_visited = self.pages_visited,
            tracked_author_posts = self.stats.count(crate::anonymization::Placeholder::User),
            duration_secs = self.duration.as_secs(),
            interrupted = self.interrupted,
            "Scrape completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Scrape completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    "Scrape error"
                );
            }
        }
    }
}

/// Type of scrape error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeErrorType {
    /// Page could not be fetched
    Fetch,
    /// Session cookie rejected (redirected to login)
    Session,
    /// Page could not be parsed
    Parse,
    /// Unknown error
    Unknown,
}

/// Scrape error with context
#[derive(Debug, Clone)]
pub struct ScrapeError {
    /// Type of error
    pub error_type: ScrapeErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g. the URL involved)
    pub context: Option<String>,
}

impl ScrapeError {
    /// Create a new scrape error
    pub fn new(error_type: ScrapeErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
