//! Integration tests for the scrape coordinator using an in-memory page source

use async_trait::async_trait;
use parley::adapters::moodle::{Page, PageFetcher};
use parley::anonymization::AuthorAnonymizer;
use parley::core::scrape::{ScrapeCoordinator, ScrapeErrorType, ScrapeSettings};
use parley::domain::{FetchError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

const BASE: &str = "https://moodle.example.com";
const TRACKED: &str = "Tomas Bañales Gutierrez";

/// Serves canned pages and records every request
#[derive(Default)]
struct StaticFetcher {
    pages: HashMap<String, String>,
    login_redirects: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    fn page(mut self, url: &str, body: String) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    fn login_redirect(mut self, url: &str) -> Self {
        self.login_redirects.push(url.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.login_redirects.iter().any(|u| u == url.as_str()) {
            return Err(FetchError::LoginRedirect(format!("{BASE}/login/index.php")).into());
        }

        match self.pages.get(url.as_str()) {
            Some(body) => Ok(Page::new(url.clone(), body.clone())),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }
            .into()),
        }
    }
}

/// Requests shutdown once a given page has been served
struct InterruptingFetcher {
    inner: StaticFetcher,
    trigger: String,
    shutdown_tx: watch::Sender<bool>,
}

#[async_trait]
impl PageFetcher for InterruptingFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page> {
        let page = self.inner.fetch(url).await;
        if url.as_str() == self.trigger {
            let _ = self.shutdown_tx.send(true);
        }
        page
    }
}

fn forum(id: u32) -> String {
    format!("{BASE}/mod/forum/view.php?id={id}")
}

fn forum_page(id: u32, page: usize) -> String {
    format!("{}&page={page}", forum(id))
}

fn discussion(d: u32) -> String {
    format!("{BASE}/mod/forum/discuss.php?d={d}")
}

fn listing(discussions: &[u32]) -> String {
    let rows: String = discussions
        .iter()
        .map(|d| {
            format!(
                r#"<tr class="discussion topic"><th><div class="d-flex">
<a class="w-100 h-100 d-block" href="/mod/forum/discuss.php?d={d}">Topic {d}</a>
</div></th></tr>"#
            )
        })
        .collect();
    format!("<html><body><table>{rows}</table></body></html>")
}

fn thread(authors: &[&str]) -> String {
    let posts: String = authors
        .iter()
        .enumerate()
        .map(|(i, author)| {
            format!(
                r#"<article class="forum-post-container"><header>
<h3 data-region-content="forum-post-core-subject">Post {i}</h3>
<a href="{BASE}/user/view.php?id={i}">{author}</a>
<time datetime="2024-03-0{i}T10:00:00Z">day</time>
</header><div class="post-content-container">message {i} from {author}</div></article>"#
            )
        })
        .collect();
    format!("<html><body>{posts}</body></html>")
}

fn coordinator(
    fetcher: Arc<StaticFetcher>,
    max_pages: Option<usize>,
) -> (ScrapeCoordinator, watch::Sender<bool>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let settings = ScrapeSettings {
        request_delay: Duration::ZERO,
        max_pages,
    };
    let coordinator =
        ScrapeCoordinator::new(fetcher, AuthorAnonymizer::new(TRACKED), settings, shutdown_rx)
            .unwrap();
    (coordinator, shutdown_tx)
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[tokio::test]
async fn test_paginates_until_page_fails() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1, 2]))
            .page(&forum_page(7, 1), listing(&[3]))
            .page(&discussion(1), thread(&[TRACKED, "Jane Doe"]))
            .page(&discussion(2), thread(&["Jane Doe"]))
            .page(&discussion(3), thread(&["Profesor Ruiz", TRACKED])),
    );
    let (coordinator, _tx) = coordinator(fetcher.clone(), None);

    let summary = coordinator.run(&[url(&forum(7))]).await;

    assert_eq!(summary.total_forums, 1);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.total_discussions(), 3);
    assert_eq!(summary.total_posts(), 5);
    assert!(summary.errors.is_empty(), "{:?}", summary.errors);
    assert!(summary.is_successful());

    let urls: Vec<&str> = summary.discussions.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(urls, vec![discussion(1), discussion(2), discussion(3)]);

    let authors: Vec<&str> = summary.discussions[0]
        .posts
        .iter()
        .map(|p| p.author.as_str())
        .collect();
    assert_eq!(authors, vec!["User", "Developer"]);
    assert_eq!(summary.discussions[2].posts[1].author, "User");
    assert_eq!(summary.discussions[0].posts[0].content, format!("message 0 from {TRACKED}"));

    // The third listing page is requested and its failure ends pagination
    assert!(fetcher.requests().contains(&forum_page(7, 2)));
}

#[tokio::test]
async fn test_stops_when_listing_repeats() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1]))
            .page(&forum_page(7, 1), listing(&[1]))
            .page(&forum_page(7, 2), listing(&[2]))
            .page(&discussion(1), thread(&["Jane Doe"]))
            .page(&discussion(2), thread(&["Jane Doe"])),
    );
    let (coordinator, _tx) = coordinator(fetcher.clone(), None);

    let summary = coordinator.run(&[url(&forum(7))]).await;

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.total_discussions(), 1);
    assert!(!fetcher.requests().contains(&forum_page(7, 2)));
}

#[tokio::test]
async fn test_max_pages() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1]))
            .page(&forum_page(7, 1), listing(&[2]))
            .page(&discussion(1), thread(&["Jane Doe"]))
            .page(&discussion(2), thread(&["Jane Doe"])),
    );
    let (coordinator, _tx) = coordinator(fetcher.clone(), Some(1));

    let summary = coordinator.run(&[url(&forum(7))]).await;

    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.total_discussions(), 1);
    assert!(!fetcher.requests().contains(&forum_page(7, 1)));
}

#[tokio::test]
async fn test_failed_discussion_is_recorded_not_fatal() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1, 2]))
            .page(&discussion(2), thread(&["Jane Doe"])),
    );
    let (coordinator, _tx) = coordinator(fetcher, None);

    let summary = coordinator.run(&[url(&forum(7))]).await;

    assert_eq!(summary.total_discussions(), 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, ScrapeErrorType::Fetch);
    assert_eq!(summary.errors[0].context.as_deref(), Some(discussion(1).as_str()));
    assert!(!summary.is_successful());
}

#[tokio::test]
async fn test_unreachable_forum_is_recorded() {
    let fetcher = Arc::new(StaticFetcher::default());
    let (coordinator, _tx) = coordinator(fetcher, None);

    let summary = coordinator.run(&[url(&forum(7))]).await;

    assert!(!summary.has_discussions());
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, ScrapeErrorType::Fetch);
}

#[tokio::test]
async fn test_login_redirect_stops_run_and_keeps_partial_result() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1, 2]))
            .page(&discussion(1), thread(&["Jane Doe"]))
            .login_redirect(&discussion(2))
            .page(&forum_page(8, 0), listing(&[3])),
    );
    let (coordinator, _tx) = coordinator(fetcher.clone(), None);

    let summary = coordinator.run(&[url(&forum(7)), url(&forum(8))]).await;

    assert!(summary.session_rejected());
    assert_eq!(summary.total_discussions(), 1);
    assert!(!fetcher.requests().contains(&forum_page(8, 0)));
}

#[tokio::test]
async fn test_discussion_without_posts_is_dropped() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1, 2]))
            .page(&discussion(1), "<html><body>empty</body></html>".to_string())
            .page(&discussion(2), thread(&["Jane Doe"])),
    );
    let (coordinator, _tx) = coordinator(fetcher, None);

    let summary = coordinator.run(&[url(&forum(7))]).await;

    assert_eq!(summary.total_discussions(), 1);
    assert_eq!(summary.discussions[0].url, discussion(2));
}

#[tokio::test]
async fn test_duplicate_discussion_across_forums_replaced_in_place() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1, 2]))
            .page(&forum_page(8, 0), listing(&[1]))
            .page(&discussion(1), thread(&["Jane Doe"]))
            .page(&discussion(2), thread(&["Jane Doe"])),
    );
    let (coordinator, _tx) = coordinator(fetcher.clone(), None);

    let summary = coordinator.run(&[url(&forum(7)), url(&forum(8))]).await;

    assert_eq!(summary.total_forums, 2);
    assert_eq!(summary.total_discussions(), 2);
    assert_eq!(summary.discussions[0].url, discussion(1));

    let discussion_one_fetches = fetcher
        .requests()
        .iter()
        .filter(|r| **r == discussion(1))
        .count();
    assert_eq!(discussion_one_fetches, 2);
}

#[tokio::test]
async fn test_shutdown_before_run() {
    let fetcher = Arc::new(StaticFetcher::default().page(&forum_page(7, 0), listing(&[1])));
    let (coordinator, shutdown_tx) = coordinator(fetcher.clone(), None);
    shutdown_tx.send(true).unwrap();

    let summary = coordinator.run(&[url(&forum(7))]).await;

    assert!(summary.interrupted);
    assert!(!summary.is_successful());
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_shutdown_between_discussions_keeps_partial_result() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let fetcher = Arc::new(InterruptingFetcher {
        inner: StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1, 2]))
            .page(&discussion(1), thread(&[TRACKED, "Jane Doe"]))
            .page(&discussion(2), thread(&["Jane Doe"]))
            .page(&forum_page(8, 0), listing(&[3])),
        trigger: discussion(1),
        shutdown_tx,
    });
    let settings = ScrapeSettings {
        request_delay: Duration::ZERO,
        max_pages: None,
    };
    let coordinator = ScrapeCoordinator::new(
        fetcher.clone(),
        AuthorAnonymizer::new(TRACKED),
        settings,
        shutdown_rx,
    )
    .unwrap();

    let summary = coordinator.run(&[url(&forum(7)), url(&forum(8))]).await;

    assert!(summary.interrupted);
    assert!(!summary.is_successful());
    assert_eq!(summary.total_discussions(), 1);
    assert_eq!(summary.discussions[0].url, discussion(1));
    assert_eq!(summary.discussions[0].posts[0].author, "User");

    let requests = fetcher.inner.requests();
    assert!(requests.contains(&discussion(1)));
    assert!(!requests.contains(&discussion(2)));
    assert!(!requests.contains(&forum_page(8, 0)));
}

#[tokio::test]
async fn test_scrape_forum_directly() {
    let fetcher = Arc::new(
        StaticFetcher::default()
            .page(&forum_page(7, 0), listing(&[1]))
            .page(&discussion(1), thread(&[TRACKED])),
    );
    let (coordinator, _tx) = coordinator(fetcher, None);

    let forum_summary = coordinator.scrape_forum(&url(&forum(7))).await.unwrap();

    assert_eq!(forum_summary.total_forums, 1);
    assert_eq!(forum_summary.discussions[0].posts[0].author, "User");
    assert!(forum_summary.stats.tracked_author_seen());
}
