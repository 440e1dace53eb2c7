use percent_encoding::percent_decode_str;
use url::Url;

/// Extracts the scoping host of a URL
///
/// The host is lowercased and keeps an explicit port, so two servers on the
/// same machine (`127.0.0.1:8080` and `127.0.0.1:9090`) are different hosts.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_auditor::url::host_of;
///
/// let url = Url::parse("https://Shop.Example.com/path").unwrap();
/// assert_eq!(host_of(&url), "shop.example.com");
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_of(&url), "127.0.0.1:8080");
/// ```
pub fn host_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or("").to_lowercase();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}

/// Reduces a host to its site: the host without a leading `www.`
pub fn site_of(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Returns the last non-empty path segment, percent-decoded
///
/// Used as the filename of an image (`/files/Hero_Shot 1.JPG` →
/// `Hero_Shot 1.JPG`). Returns an empty string for the root path.
pub fn path_slug(url: &Url) -> String {
    url.path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .unwrap_or_default()
}
