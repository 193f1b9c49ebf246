//! Scrape coordinator - main orchestrator for the scrape process
//!
//! This module walks each forum's listing pages, visits every discussion,
//! anonymizes the posts it finds and collects them into a [`ScrapeSummary`].
//! Requests are strictly sequential with a configurable pause between
//! discussions.

use crate::adapters::moodle::{ForumParser, MoodleClient, PageFetcher};
use crate::anonymization::AuthorAnonymizer;
use crate::config::{MoodleConfig, ParleyConfig};
use crate::core::scrape::summary::{ScrapeError, ScrapeErrorType, ScrapeSummary};
use crate::domain::{Discussion, ParleyError, Result};
use crate::{log_discussion_scraped, log_error_with_context, log_scrape_start};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use url::Url;

/// Pacing and bounds for a scrape run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Pause after each discussion request
    pub request_delay: Duration,

    /// Maximum listing pages per forum (`None` for no limit)
    pub max_pages: Option<usize>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(1000),
            max_pages: None,
        }
    }
}

impl From<&MoodleConfig> for ScrapeSettings {
    fn from(config: &MoodleConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.request_delay_ms),
            max_pages: config.max_pages,
        }
    }
}

/// Scrape coordinator
pub struct ScrapeCoordinator {
    fetcher: Arc<dyn PageFetcher>,
    parser: ForumParser,
    anonymizer: AuthorAnonymizer,
    settings: ScrapeSettings,
    shutdown_signal: watch::Receiver<bool>,
}

impl ScrapeCoordinator {
    /// Create a coordinator around any page source
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        anonymizer: AuthorAnonymizer,
        settings: ScrapeSettings,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: ForumParser::new()?,
            anonymizer,
            settings,
            shutdown_signal,
        })
    }

    /// Create a coordinator that fetches from Moodle with the configured session
    pub fn from_config(
        config: &ParleyConfig,
        anonymizer: AuthorAnonymizer,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Result<Self> {
        let client = Arc::new(MoodleClient::new(&config.moodle)?);
        Self::new(
            client,
            anonymizer,
            ScrapeSettings::from(&config.moodle),
            shutdown_signal,
        )
    }

    /// Scrape every forum in order
    ///
    /// Per-forum failures are recorded in the summary. A rejected session
    /// stops the run, keeping whatever was scraped before it.
    pub async fn run(&self, forum_urls: &[Url]) -> ScrapeSummary {
        let start_time = Instant::now();
        let mut summary = ScrapeSummary::new();

        tracing::info!(forum_count = forum_urls.len(), "Starting scrape");

        for forum_url in forum_urls {
            if self.is_shutdown_requested() {
                tracing::warn!("Shutdown requested, skipping remaining forums");
                summary.interrupted = true;
                break;
            }

            match self.scrape_forum(forum_url).await {
                Ok(forum_summary) => summary.merge(forum_summary),
                Err(e) => {
                    log_error_with_context!(&e, "Failed to scrape forum");
                    summary.add_error(
                        ScrapeError::new(error_type_of(&e), e.to_string())
                            .with_context(forum_url.to_string()),
                    );
                }
            }

            if summary.session_rejected() || summary.interrupted {
                break;
            }
        }

        summary.with_duration(start_time.elapsed())
    }

    /// Scrape a single forum, following its listing pages
    pub async fn scrape_forum(&self, forum_url: &Url) -> Result<ScrapeSummary> {
        log_scrape_start!(forum_url);

        let mut summary = ScrapeSummary::new();
        summary.total_forums = 1;
        let mut seen: HashSet<Url> = HashSet::new();
        let mut page = 0;

        loop {
            if self.settings.max_pages.is_some_and(|max| page >= max) {
                tracing::info!(forum_url = %forum_url, pages = page, "Reached page limit");
                break;
            }

            let listing_url = page_url(forum_url, page);
            tracing::info!(page = page, url = %listing_url, "Scraping forum page");

            let listing = match self.fetcher.fetch(&listing_url).await {
                Ok(listing) => listing,
                Err(e) => {
                    if let Some(error) = self.listing_failure(&e, page, &listing_url) {
                        summary.add_error(error);
                    }
                    break;
                }
            };
            summary.pages_visited += 1;

            let links = self.parser.discussion_links(&listing.body, &listing.final_url);
            if links.is_empty() {
                tracing::info!(page = page, "No more discussions found");
                break;
            }

            let new_links: Vec<Url> = links
                .into_iter()
                .filter(|link| seen.insert(link.clone()))
                .collect();
            if new_links.is_empty() {
                tracing::info!(page = page, "Page repeats earlier discussions, stopping");
                break;
            }

            tracing::info!(
                page = page,
                discussion_count = new_links.len(),
                "Found discussions on page"
            );

            for link in &new_links {
                if self.is_shutdown_requested() {
                    tracing::warn!("Shutdown requested, stopping after current discussion");
                    summary.interrupted = true;
                    return Ok(summary);
                }

                self.scrape_discussion(link, &mut summary).await;
                if summary.session_rejected() {
                    return Ok(summary);
                }

                if !self.settings.request_delay.is_zero() {
                    tokio::time::sleep(self.settings.request_delay).await;
                }
            }

            page += 1;
        }

        Ok(summary)
    }

    /// Fetch, parse and anonymize one discussion into the summary
    async fn scrape_discussion(&self, url: &Url, summary: &mut ScrapeSummary) {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                log_error_with_context!(&e, "Failed to fetch discussion");
                summary.add_error(
                    ScrapeError::new(error_type_of(&e), e.to_string())
                        .with_context(url.to_string()),
                );
                return;
            }
        };

        let outcome = self.parser.parse_posts(&page.body);
        summary.skipped_posts += outcome.skipped;

        if outcome.posts.is_empty() {
            tracing::warn!(discussion_url = %url, "No posts found in discussion");
            return;
        }

        let posts = self.anonymizer.anonymize_owned(outcome.posts);
        log_discussion_scraped!(url, posts.len());

        summary.stats.record(&posts);
        summary.add_discussion(Discussion::new(url.as_str(), posts));
    }

    /// Decide whether a failed listing fetch is worth reporting
    ///
    /// The first page of a forum must load. A failure further along is treated
    /// as the end of the listing unless the session was rejected.
    fn listing_failure(&self, error: &ParleyError, page: usize, url: &Url) -> Option<ScrapeError> {
        let error_type = error_type_of(error);
        if page == 0 || error_type == ScrapeErrorType::Session {
            log_error_with_context!(error, "Failed to fetch forum page");
            Some(ScrapeError::new(error_type, error.to_string()).with_context(url.to_string()))
        } else {
            tracing::info!(page = page, error = %error, "Stopping pagination after failed page");
            None
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        *self.shutdown_signal.borrow()
    }
}

/// URL of the given listing page of a forum
///
/// Replaces any `page` parameter already present, so both
/// `view.php?id=7` and `view.php?id=7&page=3` paginate the same way.
pub fn page_url(forum_url: &Url, page: usize) -> Url {
    let retained: Vec<(String, String)> = forum_url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = forum_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());
    url
}

fn error_type_of(error: &ParleyError) -> ScrapeErrorType {
    match error {
        ParleyError::Fetch(fetch) if fetch.is_session_error() => ScrapeErrorType::Session,
        ParleyError::Fetch(_) => ScrapeErrorType::Fetch,
        ParleyError::Parse(_) => ScrapeErrorType::Parse,
        _ => ScrapeErrorType::Unknown,
    }
}
