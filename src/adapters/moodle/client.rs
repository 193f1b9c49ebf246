//! Moodle HTTP client
//!
//! Sends every request with the user's `MoodleSession` cookie and a browser
//! User-Agent. Moodle answers an expired or missing session with a redirect to
//! `/login/index.php`; that case is reported as
//! [`FetchError::LoginRedirect`] instead of handing the login form to the
//! parser.

use super::fetcher::{Page, PageFetcher};
use crate::config::MoodleConfig;
use crate::domain::{FetchError, InputError, ParleyError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Name of the Moodle session cookie
pub const SESSION_COOKIE_NAME: &str = "MoodleSession";

/// HTTP client for a Moodle site
pub struct MoodleClient {
    client: Client,
}

impl MoodleClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Empty`] when no session cookie is configured and a
    /// configuration error when the cookie or User-Agent are not valid header
    /// values.
    pub fn new(config: &MoodleConfig) -> Result<Self> {
        let session = config
            .session
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty())
            .ok_or_else(|| InputError::Empty("MoodleSession cookie".to_string()))?;

        let mut cookie = HeaderValue::from_str(&format!(
            "{SESSION_COOKIE_NAME}={}",
            session.expose_secret().as_ref()
        ))
        .map_err(|_| {
            ParleyError::Configuration(
                "MoodleSession cookie contains characters not allowed in a header".to_string(),
            )
        })?;
        cookie.set_sensitive(true);

        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            ParleyError::Configuration(format!("Invalid moodle.user_agent: {e}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);
        headers.insert(USER_AGENT, user_agent);

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| {
                ParleyError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        tracing::info!(
            timeout_secs = config.timeout_seconds,
            "Moodle client initialized with session cookie"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for MoodleClient {
    async fn fetch(&self, url: &Url) -> Result<Page> {
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Page request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let final_url = response.url().clone();
        if is_login_url(&final_url) {
            tracing::error!(
                url = %url,
                final_url = %final_url,
                "Redirected to login page, session cookie might be invalid"
            );
            return Err(FetchError::LoginRedirect(final_url.to_string()).into());
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Page {
            requested_url: url.clone(),
            final_url,
            body,
        })
    }
}

/// Whether a response URL points at the Moodle login page
fn is_login_url(url: &Url) -> bool {
    url.as_str().to_lowercase().contains("login")
}
