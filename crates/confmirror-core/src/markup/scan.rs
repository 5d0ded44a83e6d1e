//! Locating embedded-asset constructs in storage-format markup.

use std::ops::Range;

use regex::{Captures, Regex};

use super::reference::AssetRef;

/// An asset reference plus the byte range of the markup it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// For [`AssetRef::DirectUrl`] the `src` attribute value, otherwise the
    /// whole construct.
    pub span: Range<usize>,
    pub reference: AssetRef,
}

/// Compiled patterns for the constructs a page can embed assets with.
#[derive(Debug, Clone)]
pub struct Scanner {
    img: Regex,
    src_attr: Regex,
    ac_image: Regex,
    ac_link: Regex,
    viewer_macro: Option<Regex>,
    attachment: Regex,
    ri_url: Regex,
}

impl Scanner {
    /// Scanner recognizing `viewer_macros` as inline file viewers.
    pub fn new<S: AsRef<str>>(viewer_macros: &[S]) -> Self {
        let names: Vec<String> = viewer_macros
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .map(regex::escape)
            .collect();
        let viewer_macro = if names.is_empty() {
            None
        } else {
            Some(compile(&format!(
                r#"(?is)<ac:structured-macro\b[^>]*?\bac:name\s*=\s*["']({})["'][^>]*>.*?</ac:structured-macro\s*>"#,
                names.join("|")
            )))
        };

        Self {
            img: compile(r"(?is)<img\b[^>]*>"),
            src_attr: compile(r#"(?is)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#),
            ac_image: compile(r"(?is)<ac:image\b[^>]*>.*?</ac:image\s*>"),
            ac_link: compile(r"(?is)<ac:link\b[^>]*>.*?</ac:link\s*>"),
            viewer_macro,
            attachment: compile(
                r#"(?is)<ri:attachment\b[^>]*?\sri:filename\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
            ),
            ri_url: compile(r#"(?is)<ri:url\b[^>]*?\sri:value\s*=\s*(?:"([^"]*)"|'([^']*)')"#),
        }
    }

    /// All embeds of `markup` in document order. When two constructs
    /// overlap, the one starting first wins.
    pub fn scan(&self, markup: &str) -> Vec<Embed> {
        let mut found = Vec::new();

        for m in self.img.find_iter(markup) {
            if let Some(caps) = self.src_attr.captures(m.as_str()) {
                if let Some(value) = quoted(&caps) {
                    let start = m.start() + value.start();
                    found.push(Embed {
                        span: start..start + value.len(),
                        reference: AssetRef::DirectUrl {
                            src: decode(value.as_str()),
                        },
                    });
                }
            }
        }

        for m in self.ac_image.find_iter(markup) {
            let reference = if let Some(filename) = self.first_attr(&self.attachment, m.as_str()) {
                AssetRef::AttachmentImage { filename }
            } else if let Some(url) = self.first_attr(&self.ri_url, m.as_str()) {
                AssetRef::ExternalImage { url }
            } else {
                continue;
            };
            found.push(Embed {
                span: m.range(),
                reference,
            });
        }

        for m in self.ac_link.find_iter(markup) {
            if let Some(filename) = self.first_attr(&self.attachment, m.as_str()) {
                found.push(Embed {
                    span: m.range(),
                    reference: AssetRef::AttachmentLink { filename },
                });
            }
        }

        if let Some(viewer) = &self.viewer_macro {
            for caps in viewer.captures_iter(markup) {
                let Some(whole) = caps.get(0) else { continue };
                let macro_name = caps
                    .get(1)
                    .map(|n| n.as_str().to_string())
                    .unwrap_or_default();
                if let Some(filename) = self.first_attr(&self.attachment, whole.as_str()) {
                    found.push(Embed {
                        span: whole.range(),
                        reference: AssetRef::MacroFile {
                            macro_name,
                            filename,
                        },
                    });
                }
            }
        }

        found.sort_by_key(|e| (e.span.start, std::cmp::Reverse(e.span.end)));
        let mut embeds: Vec<Embed> = Vec::with_capacity(found.len());
        for embed in found {
            if embeds
                .last()
                .map_or(true, |prev| embed.span.start >= prev.span.end)
            {
                embeds.push(embed);
            }
        }
        embeds
    }

    fn first_attr(&self, pattern: &Regex, haystack: &str) -> Option<String> {
        pattern
            .captures(haystack)
            .and_then(|caps| quoted(&caps).map(|v| decode(v.as_str())))
            .filter(|v| !v.trim().is_empty())
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in markup pattern is valid")
}

/// Value of a `"double"` or `'single'` quoted attribute capture.
fn quoted<'h>(caps: &Captures<'h>) -> Option<regex::Match<'h>> {
    caps.get(1).or_else(|| caps.get(2))
}

fn decode(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}
