use crate::UrlError;
use url::Url;

/// Resolves an href against a base URL into an absolute HTTP(S) URL
///
/// # Rules
///
/// 1. Trim surrounding whitespace; reject empty hrefs
/// 2. Reject `javascript:`, `mailto:`, `tel:` and `data:` links
/// 3. Join against the base (absolute hrefs are kept as they are)
/// 4. Only `http` and `https` results are accepted
///
/// # Examples
///
/// ```
/// use url::Url;
/// use venuz_scraper::url::absolutize;
///
/// let base = Url::parse("https://listing.com/best-sites").unwrap();
/// let url = absolutize("/go/alpha", &base).unwrap();
/// assert_eq!(url.as_str(), "https://listing.com/go/alpha");
/// ```
pub fn absolutize(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    for scheme in ["javascript:", "mailto:", "tel:", "data:"] {
        if lowered.starts_with(scheme) {
            return Err(UrlError::InvalidScheme(scheme.trim_end_matches(':').to_string()));
        }
    }

    let url = base.join(href).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Checks whether a string is already an absolute HTTP(S) URL with a host
pub fn is_absolute_http(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => (url.scheme() == "http" || url.scheme() == "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://listing.com/section/page").unwrap()
    }

    #[test]
    fn test_root_relative_href() {
        let url = absolutize("/go/alpha", &base()).unwrap();
        assert_eq!(url.as_str(), "https://listing.com/go/alpha");
    }

    #[test]
    fn test_path_relative_href() {
        let url = absolutize("out/beta", &base()).unwrap();
        assert_eq!(url.as_str(), "https://listing.com/section/out/beta");
    }

    #[test]
    fn test_protocol_relative_href() {
        let url = absolutize("//cdn.example.com/thumb.jpg", &base()).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/thumb.jpg");
    }

    #[test]
    fn test_absolute_href_unchanged() {
        let url = absolutize("http://other.com/visit/9?x=1", &base()).unwrap();
        assert_eq!(url.as_str(), "http://other.com/visit/9?x=1");
    }

    #[test]
    fn test_rejects_special_schemes() {
        assert!(matches!(
            absolutize("javascript:void(0)", &base()),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(absolutize("mailto:a@b.com", &base()).is_err());
        assert!(absolutize("TEL:+123", &base()).is_err());
        assert!(absolutize("data:image/png;base64,AAAA", &base()).is_err());
    }

    #[test]
    fn test_rejects_empty_href() {
        assert!(absolutize("   ", &base()).is_err());
    }

    #[test]
    fn test_is_absolute_http() {
        assert!(is_absolute_http("https://img.example.com/a.jpg"));
        assert!(!is_absolute_http("/img/a.jpg"));
        assert!(!is_absolute_http("ftp://example.com/a.jpg"));
    }
}
