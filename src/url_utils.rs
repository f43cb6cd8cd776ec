//! URL Utility Functions
//!
//! Resolution of relative link/image targets against the page URL, and the
//! page-type query answering whether a URL belongs to the target site.

use url::Url;

/// Parse a string as an absolute http(s) URL with a host.
#[must_use]
pub fn parse_absolute(s: &str) -> Option<Url> {
    let s = s.trim();
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return None;
    }
    Url::parse(s).ok().filter(|url| url.host().is_some())
}

/// Convert a relative or absolute URL to absolute form.
///
/// Special schemes (`data:`, `javascript:`, `mailto:`, `tel:`) and fragment
/// links are returned unchanged, as is anything that fails to resolve.
///
/// # Example
///
/// ```rust
/// use grok_convo_scraper::url_utils::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://grok.com/chat/abc").ok();
/// assert_eq!(resolve("/share/1", base.as_ref()), "https://grok.com/share/1");
/// assert_eq!(resolve("mailto:a@b.c", base.as_ref()), "mailto:a@b.c");
/// assert_eq!(resolve("/share/1", None), "/share/1");
/// ```
#[must_use]
pub fn resolve(url_str: &str, base: Option<&Url>) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty()
        || url_str.starts_with('#')
        || url_str.starts_with("data:")
        || url_str.starts_with("javascript:")
        || url_str.starts_with("mailto:")
        || url_str.starts_with("tel:")
    {
        return url_str.to_string();
    }

    if parse_absolute(url_str).is_some() {
        return url_str.to_string();
    }

    match base.map(|b| b.join(url_str)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => url_str.to_string(),
    }
}

/// Whether `url` belongs to `host` (the host itself or one of its subdomains).
///
/// # Example
///
/// ```rust
/// use grok_convo_scraper::url_utils::is_target_page;
///
/// assert!(is_target_page("https://grok.com/chat/123", "grok.com"));
/// assert!(is_target_page("https://www.grok.com/", "grok.com"));
/// assert!(!is_target_page("https://notgrok.com/", "grok.com"));
/// assert!(!is_target_page("not a url", "grok.com"));
/// ```
#[must_use]
pub fn is_target_page(url: &str, host: &str) -> bool {
    let Some(page_host) = parse_absolute(url).and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };
    let host = host.trim().to_ascii_lowercase();
    !host.is_empty() && (page_host == host || page_host.ends_with(&format!(".{host}")))
}
