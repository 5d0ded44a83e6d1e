//! Path-component sanitization for titles and attachment names.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Makes `name` usable as a single path component.
///
/// - Replaces `/`, `\`, NUL and control characters with `_`
/// - Replaces empty, `.` and `..` with `_`
/// - Truncates to 255 bytes on a char boundary
///
/// Everything else, including spaces, is kept so names stay recognizable.
pub fn sanitize_component(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c == '\0' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let truncated = truncate_to(&replaced, NAME_MAX);
    if truncated.is_empty() || truncated == "." || truncated == ".." {
        "_".to_string()
    } else {
        truncated.to_string()
    }
}

/// `{sanitized-title}_{id}`: the name of a page's directory and, with `.md`
/// appended, of its document.
///
/// The title part is shortened when needed so the document name fits in a
/// single path component; the id suffix is always kept whole.
pub fn page_stem(title: &str, page_id: &str) -> String {
    let suffix = format!("_{}", page_id);
    let budget = NAME_MAX.saturating_sub(suffix.len() + ".md".len());
    let title = sanitize_component(title);
    format!("{}{}", truncate_to(&title, budget), suffix)
}

fn truncate_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
