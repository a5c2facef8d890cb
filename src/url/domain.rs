use crate::UrlError;
use url::Url;

/// The host boundary of one crawl run
///
/// Built once from the seed URL and never changed afterwards. Only the host
/// takes part in scope decisions: scheme and port are ignored, and
/// subdomains are distinct hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    host: String,
}

impl CrawlScope {
    /// Creates a scope from an already-parsed seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlScope)` - The seed's host
    /// * `Err(UrlError::MissingHost)` - The seed has no host (e.g. `file:///`)
    pub fn from_seed(seed: &Url) -> Result<Self, UrlError> {
        let host = extract_host(seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;
        Ok(Self { host })
    }

    /// Creates a scope directly from a host string
    pub fn from_host(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// The host this scope admits
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if `candidate` parses and its host equals the scope host
    pub fn contains(&self, candidate: &str) -> bool {
        in_scope(candidate, self)
    }
}

/// Decides whether a candidate URL belongs to the crawl scope
///
/// Malformed candidates are out of scope.
///
/// # Examples
///
/// ```
/// use hostcrawl::url::{in_scope, CrawlScope};
///
/// let scope = CrawlScope::from_host("example.com");
/// assert!(in_scope("https://example.com/x", &scope));
/// assert!(!in_scope("https://a.example.com/x", &scope));
/// assert!(!in_scope("not a url", &scope));
/// ```
pub fn in_scope(candidate: &str, scope: &CrawlScope) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.host_str() == Some(scope.host()),
        Err(_) => false,
    }
}

/// Extracts the host from a URL
///
/// The `url` crate already lowercases hosts of http(s) URLs while parsing, so
/// the returned string is the canonical host form.
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> CrawlScope {
        CrawlScope::from_host("example.com")
    }

    #[test]
    fn test_same_host_in_scope() {
        assert!(in_scope("https://example.com/x", &scope()));
    }

    #[test]
    fn test_subdomain_out_of_scope() {
        assert!(!in_scope("https://a.example.com/x", &scope()));
    }

    #[test]
    fn test_malformed_out_of_scope() {
        assert!(!in_scope("not a url", &scope()));
        assert!(!in_scope("", &scope()));
    }

    #[test]
    fn test_scheme_and_port_ignored() {
        assert!(in_scope("http://example.com/x", &scope()));
        assert!(in_scope("https://example.com:8443/x", &scope()));
    }

    #[test]
    fn test_other_host_out_of_scope() {
        assert!(!in_scope("https://example.org/", &scope()));
        assert!(!in_scope("https://notexample.com/", &scope()));
    }

    #[test]
    fn test_host_without_url_is_out_of_scope() {
        assert!(!in_scope("mailto:someone@example.com", &scope()));
    }

    #[test]
    fn test_uppercase_host_matches_after_parse() {
        assert!(in_scope("https://EXAMPLE.COM/page", &scope()));
    }

    #[test]
    fn test_scope_from_seed() {
        let seed = Url::parse("https://Example.com:8080/start").unwrap();
        let scope = CrawlScope::from_seed(&seed).unwrap();
        assert_eq!(scope.host(), "example.com");
        assert!(scope.contains("http://example.com/other"));
    }

    #[test]
    fn test_scope_from_hostless_seed() {
        let seed = Url::parse("file:///tmp/index.html").unwrap();
        assert!(matches!(
            CrawlScope::from_seed(&seed),
            Err(UrlError::MissingHost(_))
        ));
    }

    #[test]
    fn test_ip_host_scope() {
        let seed = Url::parse("http://127.0.0.1:4000/").unwrap();
        let scope = CrawlScope::from_seed(&seed).unwrap();
        assert!(scope.contains("http://127.0.0.1:4000/a"));
        assert!(!scope.contains("http://localhost:4000/a"));
    }
}
