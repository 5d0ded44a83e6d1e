//! Content Formatter: storage markup to the final Markdown document.

use std::io;

use htmd::HtmlToMarkdown;

/// Converts `markup` to Markdown and prepends the `# {title}` heading.
///
/// Every non-overlapping `"\n\n"` of the converted body becomes `"\n"` in a
/// single pass, so paragraph breaks collapse and `"\n\n\n\n"` keeps exactly
/// one blank line. Existing exports depend on this output shape.
pub fn format_document(title: &str, markup: &str) -> io::Result<String> {
    let body = to_markdown(markup)?;
    Ok(format!("# {}\n\n{}", title, collapse_blank_lines(&body)))
}

fn to_markdown(markup: &str) -> io::Result<String> {
    HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build()
        .convert(markup)
}

fn collapse_blank_lines(text: &str) -> String {
    text.replace("\n\n", "\n")
}
