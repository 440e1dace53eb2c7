use url::Url;

/// Resolves an href against the page it was found on
///
/// # Resolution Rules
///
/// 1. Trim surrounding whitespace; empty hrefs are skipped
/// 2. Skip `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// 3. Join against `base` (relative, root-relative and scheme-relative forms)
/// 4. Only HTTP and HTTPS results are kept
/// 5. Remove the fragment (everything after #)
///
/// A fragment-only href (`#top`) therefore resolves to the base page itself.
///
/// # Returns
///
/// * `Some(Url)` - Absolute URL without fragment
/// * `None` - The href is empty, malformed or not a web link
///
/// # Examples
///
/// ```
/// use site_auditor::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/collections/all").unwrap();
/// let url = resolve_url("../products/a#reviews", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/products/a");
/// assert!(resolve_url("mailto:hi@example.com", &base).is_none());
/// ```
pub fn resolve_url(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    if absolute.host_str().is_none() {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute)
}

/// Returns a copy of the URL with its query string removed
pub fn strip_params(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped
}

/// Key used by the frontier to decide whether a URL was already seen
///
/// Parameters are ignored unless the caller asks for them, so
/// `/products/a?variant=1` and `/products/a?variant=2` collapse to one page.
pub fn dedup_key(url: &Url, include_params: bool) -> String {
    if include_params {
        url.as_str().to_string()
    } else {
        strip_params(url).into()
    }
}
