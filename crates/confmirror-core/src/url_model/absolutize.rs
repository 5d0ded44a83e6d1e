//! Absolute URL derivation for API links and markup sources.

use url::Url;

/// True when `s` is an absolute URL (`https:`, `http:`, `data:`, ...).
pub fn has_scheme(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Absolutizes a link returned by the REST API (`_links.next`,
/// `_links.download`).
///
/// These links are relative to the API base (which usually carries a context
/// path such as `/wiki`), so they are appended to it rather than resolved
/// against the host root.
pub fn absolutize_api_link(base_url: &str, link: &str) -> String {
    if has_scheme(link) {
        return link.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if link.starts_with('/') {
        format!("{}{}", base, link)
    } else {
        format!("{}/{}", base, link)
    }
}

/// Resolves the `src` of an embedded `<img>` to an absolute download URL.
///
/// - absolute `http`/`https` sources are used as is;
/// - site-relative sources starting with `site_root` are resolved against
///   the origin of `base_url`;
/// - anything else cannot be resolved and yields `None`.
pub fn resolve_markup_src(base_url: &str, site_root: &str, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    if has_scheme(src) {
        return Url::parse(src)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .map(String::from);
    }
    if src.starts_with("//") || !src.starts_with(site_root) || !src.starts_with('/') {
        return None;
    }
    let base = Url::parse(base_url).ok()?;
    base.join(src).ok().map(String::from)
}

/// Site root used when none is configured: the path of the base URL
/// (e.g. `/wiki`), or `/` when the base URL has no path.
pub fn default_site_root(base_url: &str) -> String {
    Url::parse(base_url)
        .ok()
        .map(|u| u.path().trim_end_matches('/').to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/".to_string())
}
