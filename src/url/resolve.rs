use url::Url;

/// Returns true for the schemes the crawler is willing to fetch
pub fn is_crawlable_scheme(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// Resolves a link href against the page URL
///
/// Returns the canonical string form of the absolute URL, or `None` if the
/// reference does not parse or resolves to anything other than http/https
/// (`mailto:`, `javascript:`, `data:`, ...). No normalization happens beyond
/// what resolution itself produces, so fragments are kept.
///
/// # Examples
///
/// ```
/// use hostcrawl::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/dir/page.html").unwrap();
/// assert_eq!(
///     resolve_link("../other.html", &base).as_deref(),
///     Some("https://example.com/other.html")
/// );
/// assert_eq!(resolve_link("mailto:a@b.com", &base), None);
/// ```
pub fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let resolved = base.join(href).ok()?;
    if is_crawlable_scheme(&resolved) {
        Some(resolved.into())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/dir/page.html").unwrap()
    }

    #[test]
    fn test_parent_relative() {
        assert_eq!(
            resolve_link("../other.html", &base()).as_deref(),
            Some("https://example.com/other.html")
        );
    }

    #[test]
    fn test_sibling_relative() {
        assert_eq!(
            resolve_link("next.html", &base()).as_deref(),
            Some("https://example.com/dir/next.html")
        );
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            resolve_link("/about", &base()).as_deref(),
            Some("https://example.com/about")
        );
    }

    #[test]
    fn test_scheme_relative() {
        assert_eq!(
            resolve_link("//cdn.example.com/a", &base()).as_deref(),
            Some("https://cdn.example.com/a")
        );
    }

    #[test]
    fn test_absolute_http_kept() {
        assert_eq!(
            resolve_link("http://other.com/x", &base()).as_deref(),
            Some("http://other.com/x")
        );
    }

    #[test]
    fn test_non_http_schemes_discarded() {
        assert_eq!(resolve_link("mailto:a@b.com", &base()), None);
        assert_eq!(resolve_link("javascript:void(0)", &base()), None);
        assert_eq!(resolve_link("tel:+1234567890", &base()), None);
        assert_eq!(resolve_link("ftp://example.com/file", &base()), None);
    }

    #[test]
    fn test_unparseable_discarded() {
        assert_eq!(resolve_link("http://[::1", &base()), None);
    }

    #[test]
    fn test_fragment_is_not_stripped() {
        assert_eq!(
            resolve_link("#section", &base()).as_deref(),
            Some("https://example.com/dir/page.html#section")
        );
    }
}
