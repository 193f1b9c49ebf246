//! Author anonymization
//!
//! This module provides [`AuthorAnonymizer`], the substitution rule applied to
//! every scraped post: the tracked author becomes `"User"`, everybody else
//! becomes `"Developer"`.
//!
//! The rule is a pure function of the post's author and the tracked author.
//! Comparison is exact and case-sensitive over the full Unicode string; names
//! are not trimmed or case-folded. Content, title and date are never inspected.
//!
//! # Examples
//!
//! ```
//! use parley::anonymization::AuthorAnonymizer;
//! use parley::domain::ForumPost;
//!
//! let anonymizer = AuthorAnonymizer::new("Tomas Bañales Gutierrez");
//! let posts = vec![
//!     ForumPost::new("Tomas Bañales Gutierrez", "first"),
//!     ForumPost::new("Jane Doe", "second"),
//! ];
//!
//! let anonymized = anonymizer.anonymize(&posts);
//! assert_eq!(anonymized[0].author, "User");
//! assert_eq!(anonymized[1].author, "Developer");
//! assert_eq!(anonymized[1].content, "second");
//! ```

use super::placeholder::Placeholder;
use crate::domain::ForumPost;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the forum participant whose posts map to [`Placeholder::User`]
///
/// Any string is accepted, including the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedAuthor(String);

impl TrackedAuthor {
    /// Creates a tracked author
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackedAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TrackedAuthor {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for TrackedAuthor {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Replaces author names with placeholder identities
///
/// Holds only the tracked author, so one instance can be shared freely across
/// discussions of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorAnonymizer {
    tracked_author: TrackedAuthor,
}

impl AuthorAnonymizer {
    /// Creates an anonymizer for the given tracked author
    pub fn new(tracked_author: impl Into<TrackedAuthor>) -> Self {
        Self {
            tracked_author: tracked_author.into(),
        }
    }

    /// The tracked author this anonymizer matches against
    pub fn tracked_author(&self) -> &TrackedAuthor {
        &self.tracked_author
    }

    /// Placeholder for a single author name
    pub fn placeholder_for(&self, author: &str) -> Placeholder {
        if author == self.tracked_author.as_str() {
            Placeholder::User
        } else {
            Placeholder::Developer
        }
    }

    /// Anonymizes a slice of posts, returning new posts in the same order
    pub fn anonymize(&self, posts: &[ForumPost]) -> Vec<ForumPost> {
        posts
            .iter()
            .map(|post| {
                let placeholder = self.placeholder_for(&post.author);
                post.clone().with_author(placeholder.as_str())
            })
            .collect()
    }

    /// Anonymizes posts in place of the originals, without cloning content
    pub fn anonymize_owned(&self, posts: Vec<ForumPost>) -> Vec<ForumPost> {
        posts
            .into_iter()
            .map(|post| {
                let placeholder = self.placeholder_for(&post.author);
                post.with_author(placeholder.as_str())
            })
            .collect()
    }
}

/// Anonymizes `posts` against `tracked_author`
///
/// Convenience wrapper around [`AuthorAnonymizer::anonymize`].
pub fn anonymize(posts: &[ForumPost], tracked_author: &str) -> Vec<ForumPost> {
    AuthorAnonymizer::new(tracked_author).anonymize(posts)
}
