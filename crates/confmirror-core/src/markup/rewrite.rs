//! Substituting resolved embeds back into the markup.

use std::ops::Range;

use super::reference::AssetRef;
use super::scan::Embed;

/// Text that replaces `span` of the original markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub span: Range<usize>,
    pub text: String,
}

impl Replacement {
    /// Replacement pointing `embed` at `local_path` (relative to the page directory).
    pub fn for_embed(embed: &Embed, local_path: &str) -> Self {
        Self {
            span: embed.span.clone(),
            text: replacement_markup(&embed.reference, local_path),
        }
    }
}

/// Markup that takes the place of `reference` once saved at `local_path`.
///
/// Direct `<img>` sources only swap the attribute value; structured images
/// become `<img>` tags and attachment links/viewers become named hyperlinks.
pub fn replacement_markup(reference: &AssetRef, local_path: &str) -> String {
    let attr = html_escape::encode_double_quoted_attribute(local_path);
    match reference {
        AssetRef::DirectUrl { .. } => attr.into_owned(),
        AssetRef::ExternalImage { .. } | AssetRef::AttachmentImage { .. } => {
            format!(r#"<img src="{}" />"#, attr)
        }
        AssetRef::AttachmentLink { filename } | AssetRef::MacroFile { filename, .. } => {
            format!(
                r#"<a href="{}">{}</a>"#,
                attr,
                html_escape::encode_text(filename)
            )
        }
    }
}

/// Applies `replacements` to `markup`. Spans must refer to `markup`; a
/// replacement overlapping an earlier one is skipped.
pub fn apply(markup: &str, replacements: &[Replacement]) -> String {
    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by_key(|r| r.span.start);

    let mut out = String::with_capacity(markup.len());
    let mut cursor = 0;
    for r in ordered {
        if r.span.start < cursor || r.span.end > markup.len() || r.span.start > r.span.end {
            tracing::debug!(span = ?r.span, "skipping overlapping or out-of-range replacement");
            continue;
        }
        out.push_str(&markup[cursor..r.span.start]);
        out.push_str(&r.text);
        cursor = r.span.end;
    }
    out.push_str(&markup[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Scanner;

    #[test]
    fn direct_src_swapped_in_place() {
        let markup = r#"<p><img alt="a" src="/wiki/images/foo.png" width="10"/></p>"#;
        let embeds = Scanner::new(&["view-file"]).scan(markup);
        let out = apply(markup, &[Replacement::for_embed(&embeds[0], "images/foo.png")]);
        assert_eq!(out, r#"<p><img alt="a" src="images/foo.png" width="10"/></p>"#);
    }

    #[test]
    fn attachment_link_becomes_named_hyperlink() {
        let reference = AssetRef::AttachmentLink {
            filename: "Q&A.pdf".to_string(),
        };
        assert_eq!(
            replacement_markup(&reference, "files/Q&A.pdf"),
            r#"<a href="files/Q&amp;A.pdf">Q&amp;A.pdf</a>"#
        );
    }

    #[test]
    fn structured_image_becomes_img_tag() {
        let reference = AssetRef::AttachmentImage {
            filename: "x.png".to_string(),
        };
        assert_eq!(
            replacement_markup(&reference, "images/x.png"),
            r#"<img src="images/x.png" />"#
        );
    }

    #[test]
    fn unreplaced_embeds_keep_original_text() {
        let markup = r#"A<ac:image><ri:attachment ri:filename="a.png"/></ac:image>B<ac:image><ri:attachment ri:filename="b.png"/></ac:image>C"#;
        let embeds = Scanner::new(&["view-file"]).scan(markup);
        let out = apply(markup, &[Replacement::for_embed(&embeds[1], "images/b.png")]);
        assert_eq!(
            out,
            r#"A<ac:image><ri:attachment ri:filename="a.png"/></ac:image>B<img src="images/b.png" />C"#
        );
    }

    #[test]
    fn no_replacements_is_identity() {
        assert_eq!(apply("<p>x</p>", &[]), "<p>x</p>");
    }

    #[test]
    fn overlapping_replacement_skipped() {
        let out = apply(
            "0123456789",
            &[
                Replacement {
                    span: 2..6,
                    text: "A".to_string(),
                },
                Replacement {
                    span: 4..8,
                    text: "B".to_string(),
                },
            ],
        );
        assert_eq!(out, "01A6789");
    }
}
