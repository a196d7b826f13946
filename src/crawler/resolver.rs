//! Redirector link resolution
//!
//! Listing sites route outbound links through their own redirectors
//! (`/go/<slug>`). This module walks those redirect chains by hand and
//! stops at the first hop that leaves the listing domain, so the external
//! destination itself is never contacted.

use crate::config::HttpConfig;
use crate::crawler::fetcher::build_http_client;
use crate::url::{belongs_to_domain, origin_of};
use reqwest::header::LOCATION;
use reqwest::{redirect::Policy, Client, Method, Response};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Maximum redirect hops followed per chain
pub const MAX_HOPS: usize = 10;

/// How a resolution attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The URL was not on the listing domain; no request was made
    NotListing,

    /// The chain left the listing domain; the URL is the destination origin
    External,

    /// The chain never left the listing domain
    StayedOnListing,

    /// A request failed; the URL is the original one
    Failed(String),
}

/// Result of resolving one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: String,
    pub outcome: ResolveOutcome,
}

impl ResolvedLink {
    fn unchanged(url: &str, outcome: ResolveOutcome) -> Self {
        Self {
            url: url.to_string(),
            outcome,
        }
    }
}

/// Where a single chain walk ended
enum ChainEnd {
    Left(Url),
    Stayed,
}

/// Resolves redirector links to their destination origin
pub struct LinkResolver {
    client: Client,
    listing_domain: String,
    max_hops: usize,
}

impl LinkResolver {
    /// Creates a resolver around a client that does not follow redirects
    ///
    /// # Arguments
    ///
    /// * `client` - Client built with `Policy::none()`
    /// * `listing_domain` - Host of the listing site
    pub fn new(client: Client, listing_domain: impl Into<String>) -> Self {
        Self {
            client,
            listing_domain: listing_domain.into(),
            max_hops: MAX_HOPS,
        }
    }

    /// Builds a resolver from configuration
    pub fn from_config(
        config: &HttpConfig,
        listing_domain: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config, Policy::none(), config.resolve_timeout)?;
        Ok(Self::new(client, listing_domain))
    }

    pub fn listing_domain(&self) -> &str {
        &self.listing_domain
    }

    /// Resolves a link to the origin of its external destination
    ///
    /// Never fails: on any error the original URL is returned with
    /// [`ResolveOutcome::Failed`].
    ///
    /// # Request Flow
    ///
    /// 1. Off-domain URL → returned as is, no request
    /// 2. HEAD chain, following `Location` by hand
    /// 3. If the HEAD chain stayed on the listing domain, GET chain that
    ///    also honours `<meta http-equiv="refresh">`
    pub async fn resolve(&self, url: &str) -> ResolvedLink {
        let start = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Cannot resolve unparseable URL {}: {}", url, e);
                return ResolvedLink::unchanged(url, ResolveOutcome::Failed(e.to_string()));
            }
        };

        if !belongs_to_domain(&start, &self.listing_domain) {
            return ResolvedLink::unchanged(url, ResolveOutcome::NotListing);
        }

        let mut end = self.follow_chain(Method::HEAD, &start).await;
        if matches!(end, Ok(ChainEnd::Stayed)) {
            end = self.follow_chain(Method::GET, &start).await;
        }

        match end {
            Ok(ChainEnd::Left(destination)) => {
                let origin = origin_of(&destination);
                tracing::debug!("Resolved {} -> {}", url, origin);
                ResolvedLink {
                    url: origin,
                    outcome: ResolveOutcome::External,
                }
            }
            Ok(ChainEnd::Stayed) => ResolvedLink::unchanged(url, ResolveOutcome::StayedOnListing),
            Err(reason) => {
                tracing::warn!("Failed to resolve {}: {}", url, reason);
                ResolvedLink::unchanged(url, ResolveOutcome::Failed(reason))
            }
        }
    }

    /// Walks one redirect chain with the given method
    async fn follow_chain(&self, method: Method, start: &Url) -> Result<ChainEnd, String> {
        let mut current = start.clone();
        let mut visited = HashSet::new();

        for _ in 0..=self.max_hops {
            if !visited.insert(current.to_string()) {
                return Err(format!("redirect loop at {}", current));
            }

            let response = self
                .client
                .request(method.clone(), current.clone())
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let next = if response.status().is_redirection() {
                location_target(&response, &current)
            } else if method == Method::GET && response.status().is_success() {
                let body = response.text().await.map_err(|e| e.to_string())?;
                meta_refresh_target(&body, &current)
            } else {
                None
            };

            match next {
                None => return Ok(ChainEnd::Stayed),
                Some(next) if !belongs_to_domain(&next, &self.listing_domain) => {
                    return Ok(ChainEnd::Left(next));
                }
                Some(next) => current = next,
            }
        }

        Err(format!("more than {} redirects", self.max_hops))
    }
}

/// Resolves the `Location` header of a redirect response
fn location_target(response: &Response, current: &Url) -> Option<Url> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location.trim()).ok()
}

/// Extracts the target of a `<meta http-equiv="refresh">` tag
///
/// Accepts `content` values such as `0; url=https://x`, `0;URL='/next'` and
/// `5, url=/next`.
fn meta_refresh_target(body: &str, current: &Url) -> Option<Url> {
    let selector = Selector::parse("meta[http-equiv][content]").ok()?;
    let document = Html::parse_document(body);

    let content = document
        .select(&selector)
        .find(|meta| {
            meta.value()
                .attr("http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("refresh"))
        })?
        .value()
        .attr("content")?;

    let target = content.split([';', ',']).skip(1).find_map(|part| {
        let part = part.trim();
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("url")
            .then(|| value.trim().trim_matches(|c| c == '\'' || c == '"'))
    })?;

    if target.is_empty() {
        return None;
    }
    current.join(target).ok()
}
