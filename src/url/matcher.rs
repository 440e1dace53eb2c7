use crate::url::domain::site_of;

/// Checks whether a candidate host belongs to the start host's site
///
/// Both hosts are reduced with [`site_of`] first. The candidate matches when
/// it is the site itself or any subdomain of it, so for a start host of
/// `www.example.com`:
///    - `example.com` and `www.example.com` match
///    - `blog.example.com` and `cdn.shop.example.com` match
///    - `example.org` and `notexample.com` do not
///
/// # Examples
///
/// ```
/// use site_auditor::url::same_site;
///
/// assert!(same_site("www.example.com", "blog.example.com"));
/// assert!(!same_site("www.example.com", "myexample.com"));
/// ```
pub fn same_site(start_host: &str, candidate: &str) -> bool {
    let base = site_of(start_host);
    let candidate = site_of(candidate);

    if base.is_empty() || candidate.is_empty() {
        return false;
    }

    candidate == base || candidate.ends_with(&format!(".{}", base))
}
