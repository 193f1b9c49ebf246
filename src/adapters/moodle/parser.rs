//! Moodle forum markup parsing
//!
//! Extracts discussion links from a forum listing and posts from a discussion
//! page. Selectors target the Moodle 4 Boost theme:
//!
//! - discussion link: `.topic .d-flex a.w-100.h-100.d-block`
//! - post: `article.forum-post-container`, with a `header` holding the subject
//!   (`h3[data-region-content="forum-post-core-subject"]`), the author profile
//!   link (`a[href*="/user/view.php"]`) and a `time[datetime]`, and the body in
//!   `.post-content-container`

use crate::domain::{ForumPost, ParseError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const DISCUSSION_LINK: &str = ".topic .d-flex a.w-100.h-100.d-block";
const POST: &str = "article.forum-post-container";
const POST_CONTENT: &str = ".post-content-container";
const POST_HEADER: &str = "header";
const POST_SUBJECT: &str = r#"h3[data-region-content="forum-post-core-subject"]"#;
const POST_AUTHOR: &str = r#"a[href*="/user/view.php"]"#;
const POST_TIME: &str = "time";

/// Posts extracted from a discussion page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Complete posts in page order
    pub posts: Vec<ForumPost>,

    /// Post containers skipped because a required element was missing
    pub skipped: usize,
}

/// Compiled selectors for Moodle forum pages
pub struct ForumParser {
    discussion_link: Selector,
    post: Selector,
    post_content: Selector,
    post_header: Selector,
    post_subject: Selector,
    post_author: Selector,
    post_time: Selector,
}

impl ForumParser {
    /// Compile the forum selectors
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Selector`] if a selector fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            discussion_link: compile(DISCUSSION_LINK)?,
            post: compile(POST)?,
            post_content: compile(POST_CONTENT)?,
            post_header: compile(POST_HEADER)?,
            post_subject: compile(POST_SUBJECT)?,
            post_author: compile(POST_AUTHOR)?,
            post_time: compile(POST_TIME)?,
        })
    }

    /// Absolute URLs of the discussions listed on a forum page
    ///
    /// Relative links are resolved against `base_url`. Anchors without an
    /// `href` or with an unresolvable one are skipped, and each discussion is
    /// returned once, in page order.
    pub fn discussion_links(&self, html: &str, base_url: &Url) -> Vec<Url> {
        let document = Html::parse_document(html);
        let mut links: Vec<Url> = Vec::new();

        for anchor in document.select(&self.discussion_link) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            match base_url.join(href) {
                Ok(url) => {
                    tracing::debug!(
                        title = %element_text(&anchor),
                        url = %url,
                        "Found discussion"
                    );
                    if !links.contains(&url) {
                        links.push(url);
                    }
                }
                Err(e) => {
                    tracing::warn!(href = %href, error = %e, "Skipping unresolvable discussion link");
                }
            }
        }

        links
    }

    /// Posts on a discussion page, in page order
    pub fn parse_posts(&self, html: &str) -> ParseOutcome {
        let document = Html::parse_document(html);
        let mut outcome = ParseOutcome::default();

        for article in document.select(&self.post) {
            match self.parse_post(&article) {
                Some(post) => outcome.posts.push(post),
                None => outcome.skipped += 1,
            }
        }

        if outcome.skipped > 0 {
            tracing::warn!(
                skipped = outcome.skipped,
                "Incomplete post data found, missing some required elements"
            );
        }

        outcome
    }

    fn parse_post(&self, article: &ElementRef<'_>) -> Option<ForumPost> {
        let content = article.select(&self.post_content).next()?;
        let header = article.select(&self.post_header).next()?;

        let title = header.select(&self.post_subject).next()?;
        let author = header.select(&self.post_author).next()?;
        let time = header.select(&self.post_time).next()?;

        Some(
            ForumPost::new(element_text(&author), element_text(&content))
                .with_title(element_text(&title))
                .with_date(time.value().attr("datetime").unwrap_or_default()),
        )
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        ParseError::Selector {
            selector: selector.to_string(),
            message: format!("{e:?}"),
        }
        .into()
    })
}

/// Text of an element with each fragment trimmed and fragments joined by single spaces
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
