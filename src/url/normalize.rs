use crate::url::page_authority;
use crate::UrlError;
use url::{ParseError, Url};

/// Normalizes a URL into the key used to deduplicate and count pages
///
/// # Normalization Rules
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` (scheme-less input is rejected here too)
/// 3. Require a non-empty host
/// 4. Build `host[:port]` + path, then `?query` if the query is non-empty
///
/// The scheme and fragment are always dropped. Nothing else is rewritten beyond
/// what parsing already does (lowercased host, default port removed, an empty
/// path read as `/`).
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - Normalized page key
/// * `Err(UrlError)` - The URL is malformed, uses another scheme, or has no host
///
/// # Examples
///
/// ```
/// use sumi_census::url::normalize_url;
///
/// let key = normalize_url("https://blog.example.com/path?page=2#top").unwrap();
/// assert_eq!(key, "blog.example.com/path?page=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            return Err(UrlError::UnsupportedScheme(String::new()));
        }
        Err(ParseError::EmptyHost) => return Err(UrlError::MissingHost),
        Err(e) => return Err(UrlError::Malformed(e.to_string())),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    let mut key = page_authority(&url).ok_or(UrlError::MissingHost)?;
    key.push_str(url.path());

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        key.push('?');
        key.push_str(query);
    }

    Ok(key)
}
