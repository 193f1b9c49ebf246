//! Page fetching abstraction
//!
//! The scrape coordinator only needs "give me the HTML behind this URL". The
//! [`PageFetcher`] trait captures that so the HTTP client can be swapped for
//! canned pages in tests.

use crate::domain::Result;
use async_trait::async_trait;
use url::Url;

/// A fetched HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// URL that was requested
    pub requested_url: Url,

    /// URL the response came from, after redirects
    pub final_url: Url,

    /// Response body
    pub body: String,
}

impl Page {
    /// Creates a page that was served without redirects
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            requested_url: url.clone(),
            final_url: url,
            body: body.into(),
        }
    }
}

/// Source of forum pages
///
/// # Example
///
/// ```no_run
/// use parley::adapters::moodle::{MoodleClient, PageFetcher};
/// use parley::config::MoodleConfig;
/// use url::Url;
///
/// # async fn example(config: MoodleConfig) -> parley::domain::Result<()> {
/// let client = MoodleClient::new(&config)?;
/// let url = Url::parse("https://moodle.example.com/mod/forum/view.php?id=1")?;
/// let page = client.fetch(&url).await?;
/// println!("{} bytes", page.body.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url`
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`](crate::domain::FetchError) when the page
    /// cannot be retrieved or the session is no longer valid.
    async fn fetch(&self, url: &Url) -> Result<Page>;
}
