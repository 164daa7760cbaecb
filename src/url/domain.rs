use url::Url;

/// Returns the authority of a URL: its host, plus `:port` when a non-default
/// port is present
///
/// The `url` crate lowercases hosts and drops default ports while parsing, so
/// `https://EXAMPLE.com:443/` and `https://example.com/` share an authority.
///
/// # Arguments
///
/// * `url` - The URL to extract the authority from
///
/// # Returns
///
/// * `Some(String)` - The host, with the port appended if one is set
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_census::url::page_authority;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(page_authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/path").unwrap();
/// assert_eq!(page_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn page_authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Returns true if both URLs point at the same authority
///
/// URLs without a host never match anything, including each other.
pub fn is_same_host(a: &Url, b: &Url) -> bool {
    match (page_authority(a), page_authority(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
