//! Response shapes of the Confluence REST API, and the page model built from them.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Opaque page identifier. The API may send it as a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => PageId(s),
            Raw::Number(n) => PageId(n.to_string()),
        })
    }
}

/// A page with its storage-format body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    /// Raw storage-format (XHTML) markup; empty when the API sent no body.
    pub body: String,
}

/// `{id, title}` entry of a child listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageSummary {
    pub id: PageId,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub download: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StorageValue {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Body {
    #[serde(default)]
    pub storage: Option<StorageValue>,
}

/// `GET /rest/api/content/{id}?expand=body.storage,title`
#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    pub id: PageId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<Body>,
}

impl ContentResponse {
    pub(crate) fn into_page(self) -> Page {
        let body = match self.body.and_then(|b| b.storage) {
            Some(storage) => storage.value,
            None => {
                tracing::warn!(page_id = %self.id, "page has no storage body; exporting title only");
                String::new()
            }
        };
        Page {
            id: self.id,
            title: self.title,
            body,
        }
    }
}

/// Paginated `results` + `_links` envelope used by child listings.
#[derive(Debug, Deserialize)]
pub(crate) struct Listing<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, rename = "_links")]
    pub links: Links,
}

/// Entry of `GET /rest/api/content/{id}/child/attachment?filename=…`.
#[derive(Debug, Deserialize)]
pub(crate) struct Attachment {
    #[serde(default, rename = "_links")]
    pub links: Links,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_id_from_string_or_number() {
        let a: PageId = serde_json::from_value(json!("12345")).unwrap();
        let b: PageId = serde_json::from_value(json!(12345)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "12345");
    }

    #[test]
    fn content_response_into_page() {
        let raw: ContentResponse = serde_json::from_value(json!({
            "id": "7",
            "title": "Runbook",
            "body": {"storage": {"value": "<p>hi</p>", "representation": "storage"}}
        }))
        .unwrap();
        let page = raw.into_page();
        assert_eq!(page.id, PageId::new("7"));
        assert_eq!(page.title, "Runbook");
        assert_eq!(page.body, "<p>hi</p>");
    }

    #[test]
    fn missing_body_is_empty_markup() {
        let raw: ContentResponse =
            serde_json::from_value(json!({"id": 8, "title": "Empty"})).unwrap();
        assert_eq!(raw.into_page().body, "");
    }

    #[test]
    fn listing_without_links_or_results() {
        let l: Listing<PageSummary> = serde_json::from_value(json!({"size": 0})).unwrap();
        assert!(l.results.is_empty());
        assert!(l.links.next.is_none());
    }

    #[test]
    fn attachment_without_download_link() {
        let l: Listing<Attachment> =
            serde_json::from_value(json!({"results": [{"id": "att1", "_links": {}}]})).unwrap();
        assert!(l.results[0].links.download.is_none());
    }
}
