//! HTTP page session
//!
//! This module handles page navigation for the coordinator, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - The `PageSession` seam a rendering browser can plug in behind
//! - Condition waits bounded by a timeout instead of fixed sleeps
//! - Error classification for failed navigations

use crate::config::HttpConfig;
use crate::ScrapeError;
use reqwest::{redirect::Policy, Client};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Condition a session waits for after navigation or scrolling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// At least one element matches the CSS selector
    Selector(String),

    /// No network activity is outstanding
    NetworkIdle,
}

/// A navigable page, one document at a time
///
/// The coordinator drives exactly one session sequentially, so
/// implementations need no internal locking.
#[allow(async_fn_in_trait)]
pub trait PageSession {
    /// Navigates to the URL, replacing the current document
    async fn goto(&mut self, url: &Url) -> Result<(), ScrapeError>;

    /// URL of the current document after any redirects
    fn current_url(&self) -> Option<&Url>;

    /// HTML of the current document
    fn content(&self) -> Result<String, ScrapeError>;

    /// Scrolls the viewport down by the given number of pixels
    async fn scroll_by(&mut self, pixels: u32);

    /// Waits until the condition holds or the timeout elapses
    ///
    /// # Returns
    ///
    /// `true` if the condition was met, `false` on timeout
    async fn wait_for(&mut self, condition: &WaitCondition, timeout: Duration) -> bool;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The outbound HTTP settings
/// * `redirects` - Redirect policy; the resolver walks redirects itself
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    config: &HttpConfig,
    redirects: Policy,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(redirects)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page session backed by plain HTTP requests
///
/// Serves the static HTML of each page. Scrolling has no effect and waits
/// are answered from the current document immediately.
pub struct HttpSession {
    client: Client,
    current: Option<(Url, String)>,
}

impl HttpSession {
    /// Wraps a client that follows redirects
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    /// Builds a session from configuration, following up to 10 redirects
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config, Policy::limited(10), config.page_timeout)?;
        Ok(Self::new(client))
    }

    fn document_matches(&self, css: &str) -> bool {
        let Some((_, body)) = &self.current else {
            return false;
        };

        match Selector::parse(css) {
            Ok(selector) => Html::parse_document(body).select(&selector).next().is_some(),
            Err(e) => {
                tracing::warn!("Invalid wait selector '{}': {:?}", css, e);
                false
            }
        }
    }
}

impl PageSession for HttpSession {
    async fn goto(&mut self, url: &Url) -> Result<(), ScrapeError> {
        tracing::debug!("Navigating to {}", url);
        self.current = None;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        self.current = Some((final_url, body));
        Ok(())
    }

    fn current_url(&self) -> Option<&Url> {
        self.current.as_ref().map(|(url, _)| url)
    }

    fn content(&self) -> Result<String, ScrapeError> {
        self.current
            .as_ref()
            .map(|(_, body)| body.clone())
            .ok_or(ScrapeError::NoPage)
    }

    async fn scroll_by(&mut self, _pixels: u32) {}

    async fn wait_for(&mut self, condition: &WaitCondition, _timeout: Duration) -> bool {
        match condition {
            WaitCondition::NetworkIdle => self.current.is_some(),
            WaitCondition::Selector(css) => self.document_matches(css),
        }
    }
}

/// Maps a transport error onto the crate error type
fn classify_error(url: &Url, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
