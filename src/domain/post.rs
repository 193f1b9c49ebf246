//! Forum post and discussion models
//!
//! A [`ForumPost`] is one contribution to a Moodle discussion as extracted by the
//! parser. Only `author` is ever rewritten; `content`, `title` and `date` are
//! carried through untouched.

use serde::{Deserialize, Serialize};

/// One forum contribution
///
/// # Examples
///
/// ```
/// use parley::domain::ForumPost;
///
/// let post = ForumPost::new("Jane Doe", "Has anyone finished lab 2?")
///     .with_title("Lab 2")
///     .with_date("2024-04-02T10:15:00-03:00");
///
/// assert_eq!(post.author, "Jane Doe");
/// assert_eq!(post.title, "Lab 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    /// Subject line of the post
    pub title: String,

    /// Message body as plain text
    pub content: String,

    /// Author display name (arbitrary Unicode)
    pub author: String,

    /// Value of the post's `datetime` attribute, empty when absent
    pub date: String,
}

impl ForumPost {
    /// Creates a post with an author and content, leaving title and date empty
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            content: content.into(),
            author: author.into(),
            date: String::new(),
        }
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Returns the same post attributed to another author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

/// A discussion thread and its posts in page order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    /// Absolute URL of the discussion page
    pub url: String,

    /// Posts in the order they appear on the page
    pub posts: Vec<ForumPost>,
}

impl Discussion {
    /// Creates a discussion
    pub fn new(url: impl Into<String>, posts: Vec<ForumPost>) -> Self {
        Self {
            url: url.into(),
            posts,
        }
    }

    /// Number of posts in the discussion
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }
}
