//! File name extraction from URL paths.

use url::Url;

/// Last path segment of `url`, without query string or fragment.
///
/// The segment is kept as it appears in the URL: escapes such as `%20` are
/// not decoded. Returns `None` when the URL does not parse, the path is
/// empty/root, or the segment is `.`/`..`.
pub fn basename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            basename_from_url("https://example.com/a/b/diagram.png").as_deref(),
            Some("diagram.png")
        );
        assert_eq!(
            basename_from_url("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(
            basename_from_url(
                "https://acme.atlassian.net/wiki/download/attachments/42/shot.png?version=1&api=v2"
            )
            .as_deref(),
            Some("shot.png")
        );
        assert_eq!(
            basename_from_url("https://example.com/a.png#frag").as_deref(),
            Some("a.png")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(basename_from_url("https://example.com/"), None);
        assert_eq!(basename_from_url("https://example.com"), None);
        assert_eq!(basename_from_url("https://example.com/dir/"), Some("dir".to_string()));
    }

    #[test]
    fn unparsable_or_opaque() {
        assert_eq!(basename_from_url("/wiki/download/a.png"), None);
        assert_eq!(basename_from_url("data:image/png;base64,AAA"), None);
    }

    #[test]
    fn escapes_are_kept() {
        assert_eq!(
            basename_from_url("https://example.com/my%20file.pdf").as_deref(),
            Some("my%20file.pdf")
        );
        assert_eq!(
            basename_from_url("https://example.com/caf%C3%A9.png").as_deref(),
            Some("caf%C3%A9.png")
        );
    }
}
