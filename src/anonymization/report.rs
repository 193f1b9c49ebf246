//! Placeholder statistics for a scrape run
//!
//! Counts are taken from already-anonymized posts, so collecting them never
//! touches the real author names.

use super::placeholder::Placeholder;
use crate::domain::ForumPost;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How many posts were attributed to each placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationStats {
    /// Total posts counted
    pub total_posts: usize,

    /// Posts per placeholder
    pub by_placeholder: HashMap<Placeholder, usize>,
}

impl AnonymizationStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a batch of anonymized posts
    ///
    /// Authors that are not a placeholder literal are counted in the total only.
    pub fn record(&mut self, posts: &[ForumPost]) {
        for post in posts {
            self.total_posts += 1;
            if let Some(placeholder) = Placeholder::ALL
                .into_iter()
                .find(|p| p.as_str() == post.author)
            {
                *self.by_placeholder.entry(placeholder).or_insert(0) += 1;
            }
        }
    }

    /// Posts attributed to the given placeholder
    pub fn count(&self, placeholder: Placeholder) -> usize {
        self.by_placeholder.get(&placeholder).copied().unwrap_or(0)
    }

    /// Whether at least one post belonged to the tracked author
    pub fn tracked_author_seen(&self) -> bool {
        self.count(Placeholder::User) > 0
    }

    /// Merge another set of statistics into this one
    pub fn merge(&mut self, other: &AnonymizationStats) {
        self.total_posts += other.total_posts;
        for (placeholder, count) in &other.by_placeholder {
            *self.by_placeholder.entry(*placeholder).or_insert(0) += count;
        }
    }
}
