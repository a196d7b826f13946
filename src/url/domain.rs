use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use venuz_scraper::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a URL's host is the given domain or one of its subdomains
///
/// A leading `www.` on the domain is ignored, so `www.listing.com` and
/// `listing.com` describe the same site.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use venuz_scraper::url::belongs_to_domain;
///
/// let url = Url::parse("https://www.listing.com/go/site").unwrap();
/// assert!(belongs_to_domain(&url, "listing.com"));
/// assert!(!belongs_to_domain(&url, "other.com"));
/// ```
pub fn belongs_to_domain(url: &Url, domain: &str) -> bool {
    let Some(host) = extract_domain(url) else {
        return false;
    };

    let domain = domain.to_lowercase();
    let base = domain.strip_prefix("www.").unwrap_or(&domain);

    host == base || host.ends_with(&format!(".{}", base))
}

/// Returns the `scheme://host[:port]` part of a URL, discarding path and query
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}
