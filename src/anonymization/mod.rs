//! Author anonymization for scraped forum posts
//!
//! Every post leaving the scraper passes through [`AuthorAnonymizer`]. The
//! tracked author is rewritten to `"User"` and every other author to
//! `"Developer"`; nothing else about the post changes.
//!
//! # Usage
//!
//! ```rust
//! use parley::anonymization::{anonymize, Placeholder};
//! use parley::domain::ForumPost;
//!
//! let posts = vec![ForumPost::new("Jane Doe", "hello")];
//! let anonymized = anonymize(&posts, "Tomas Bañales Gutierrez");
//! assert_eq!(anonymized[0].author, Placeholder::Developer.as_str());
//! ```

pub mod engine;
pub mod placeholder;
pub mod report;

pub use engine::{anonymize, AuthorAnonymizer, TrackedAuthor};
pub use placeholder::Placeholder;
pub use report::AnonymizationStats;
