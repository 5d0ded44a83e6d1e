//! Page Fetcher: the blocking API client every other stage goes through.

use serde::de::DeserializeOwned;

use super::cursor::{Cursor, CursorGuard};
use super::types::{Attachment, ContentResponse, Listing, Page, PageId, PageSummary};
use crate::config::MirrorConfig;
use crate::error::{MirrorError, Result};
use crate::http::{CurlTransport, FetchError, Response, Transport};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::url_model::absolutize_api_link;

/// Header the server's XSRF check requires on attachment downloads.
pub const ANTI_CSRF_HEADER: (&str, &str) = ("X-Atlassian-Token", "no-check");

const DEFAULT_PAGE_LIMIT: u32 = 100;
const DEFAULT_MAX_LISTING_PAGES: usize = 10_000;

pub struct ConfluenceClient {
    transport: Box<dyn Transport>,
    base_url: String,
    retry: RetryPolicy,
    page_limit: u32,
    max_listing_pages: usize,
}

impl ConfluenceClient {
    /// Client for the API rooted at `base_url` (e.g. `https://acme.atlassian.net/wiki`).
    pub fn new(base_url: &str, transport: Box<dyn Transport>) -> Result<Self> {
        url::Url::parse(base_url).map_err(|source| MirrorError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
            max_listing_pages: DEFAULT_MAX_LISTING_PAGES,
        })
    }

    /// Client backed by libcurl with the configured credentials, timeouts,
    /// retry policy and listing limits.
    pub fn from_config(cfg: &MirrorConfig) -> Result<Self> {
        let transport = CurlTransport::new(cfg.credentials())
            .with_timeouts(cfg.connect_timeout(), cfg.timeout());
        let retry = cfg
            .retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default();
        Ok(Self::new(&cfg.base_url, Box::new(transport))?
            .with_retry_policy(retry)
            .with_page_limit(cfg.page_limit)
            .with_max_listing_pages(cfg.max_listing_pages))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub fn with_max_listing_pages(mut self, max: usize) -> Self {
        self.max_listing_pages = max.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page with its storage body.
    pub fn fetch_page(&self, page_id: &PageId) -> Result<Page> {
        let url = format!(
            "{}/rest/api/content/{}?expand=body.storage,title",
            self.base_url, page_id
        );
        let raw: ContentResponse = self.get_json(&url)?;
        Ok(raw.into_page())
    }

    /// Direct children of `page_id` in listing order, following every
    /// `_links.next` cursor. Empty for a leaf page.
    pub fn fetch_children(&self, page_id: &PageId) -> Result<Vec<PageSummary>> {
        let mut guard = CursorGuard::new(page_id.as_str(), self.max_listing_pages);
        let mut cursor = Some(Cursor::start(format!(
            "{}/rest/api/content/{}/child/page?limit={}",
            self.base_url, page_id, self.page_limit
        )));
        let mut children = Vec::new();

        while let Some(current) = cursor.take() {
            guard.admit(&current)?;
            let listing: Listing<PageSummary> = self.get_json(current.as_str())?;
            children.extend(listing.results);
            cursor = listing
                .links
                .next
                .filter(|next| !next.trim().is_empty())
                .map(|next| Cursor::from_next_link(&self.base_url, &next));
        }

        tracing::debug!(
            page_id = %page_id,
            children = children.len(),
            listing_pages = guard.pages_followed(),
            "fetched child listing"
        );
        Ok(children)
    }

    /// Absolute download URL of the attachment named `filename` on `page_id`,
    /// or `None` when the page has no such attachment or no download link.
    pub fn find_attachment_download(
        &self,
        page_id: &PageId,
        filename: &str,
    ) -> Result<Option<String>> {
        let encoded: String = url::form_urlencoded::byte_serialize(filename.as_bytes()).collect();
        let url = format!(
            "{}/rest/api/content/{}/child/attachment?filename={}",
            self.base_url, page_id, encoded
        );
        let listing: Listing<Attachment> = self.get_json(&url)?;
        Ok(listing
            .results
            .into_iter()
            .next()
            .and_then(|a| a.links.download)
            .filter(|link| !link.trim().is_empty())
            .map(|link| absolutize_api_link(&self.base_url, &link)))
    }

    /// Downloads the bytes at `url` with the anti-CSRF header set.
    pub fn download(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.get_ok(url, &[ANTI_CSRF_HEADER]).map(|r| r.body)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get_ok(url, &[("Accept", "application/json")])?;
        serde_json::from_slice(&response.body).map_err(|source| MirrorError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn get_ok(&self, url: &str, headers: &[(&str, &str)]) -> std::result::Result<Response, FetchError> {
        run_with_retry(&self.retry, || {
            let response = self.transport.get(url, headers)?;
            if response.is_success() {
                Ok(response)
            } else {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: response.status,
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaginationError;
    use crate::http::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const BASE: &str = "https://acme.atlassian.net/wiki";

    fn client(t: &Arc<ScriptedTransport>) -> ConfluenceClient {
        ConfluenceClient::new(BASE, Box::new(Arc::clone(t)))
            .unwrap()
            .with_retry_policy(RetryPolicy {
                max_attempts: 1,
                base_delay: Duration::ZERO,
                max_delay: Duration::ZERO,
            })
    }

    fn children_url(id: &str) -> String {
        format!("{BASE}/rest/api/content/{id}/child/page?limit=100")
    }

    #[test]
    fn fetch_page_reads_title_and_body() {
        let t = Arc::new(ScriptedTransport::new().json(
            &format!("{BASE}/rest/api/content/5?expand=body.storage,title"),
            json!({"id": "5", "title": "Home", "body": {"storage": {"value": "<p>x</p>"}}}),
        ));
        let page = client(&t).fetch_page(&PageId::new("5")).unwrap();
        assert_eq!(page.title, "Home");
        assert_eq!(page.body, "<p>x</p>");
    }

    #[test]
    fn fetch_page_missing_is_remote_error() {
        let t = Arc::new(ScriptedTransport::new());
        let err = client(&t).fetch_page(&PageId::new("404")).unwrap_err();
        assert_eq!(err.http_status(), Some(404));
    }

    #[test]
    fn fetch_page_bad_json_is_decode_error() {
        let t = Arc::new(ScriptedTransport::new().route(
            &format!("{BASE}/rest/api/content/5?expand=body.storage,title"),
            200,
            "<html>login</html>",
        ));
        let err = client(&t).fetch_page(&PageId::new("5")).unwrap_err();
        assert!(matches!(err, MirrorError::Decode { .. }));
    }

    #[test]
    fn leaf_page_has_no_children() {
        let t = Arc::new(
            ScriptedTransport::new().json(&children_url("9"), json!({"results": [], "_links": {}})),
        );
        assert!(client(&t).fetch_children(&PageId::new("9")).unwrap().is_empty());
        assert_eq!(t.requested_urls().len(), 1);
    }

    #[test]
    fn follows_250_children_over_three_pages_in_order() {
        let page = |from: usize, to: usize, next: Option<String>| {
            let results: Vec<_> = (from..to)
                .map(|i| json!({"id": i.to_string(), "title": format!("Child {i}")}))
                .collect();
            match next {
                Some(n) => json!({"results": results, "_links": {"next": n}}),
                None => json!({"results": results, "_links": {}}),
            }
        };
        let second = "/rest/api/content/1/child/page?limit=100&start=100";
        let third = format!("{BASE}/rest/api/content/1/child/page?limit=100&start=200");
        let t = Arc::new(
            ScriptedTransport::new()
                .json(&children_url("1"), page(0, 100, Some(second.to_string())))
                .json(&format!("{BASE}{second}"), page(100, 200, Some(third.clone())))
                .json(&third, page(200, 250, None)),
        );
        let children = client(&t).fetch_children(&PageId::new("1")).unwrap();
        assert_eq!(children.len(), 250);
        for (i, c) in children.iter().enumerate() {
            assert_eq!(c.id.as_str(), i.to_string());
        }
        assert_eq!(t.requested_urls().len(), 3);
    }

    #[test]
    fn repeated_next_link_fails_instead_of_looping() {
        let t = Arc::new(ScriptedTransport::new().json(
            &children_url("1"),
            json!({"results": [{"id": "2", "title": "a"}],
                   "_links": {"next": "/rest/api/content/1/child/page?limit=100"}}),
        ));
        let err = client(&t).fetch_children(&PageId::new("1")).unwrap_err();
        assert!(matches!(
            err,
            MirrorError::Pagination(PaginationError::CursorRepeated { .. })
        ));
        assert_eq!(t.requested_urls().len(), 1);
    }

    #[test]
    fn child_listing_failure_propagates() {
        let t = Arc::new(ScriptedTransport::new().route(&children_url("1"), 403, "forbidden"));
        let err = client(&t).fetch_children(&PageId::new("1")).unwrap_err();
        assert_eq!(err.http_status(), Some(403));
    }

    #[test]
    fn attachment_lookup_encodes_filename_and_absolutizes_link() {
        let t = Arc::new(ScriptedTransport::new().json(
            &format!("{BASE}/rest/api/content/3/child/attachment?filename=my+diagram.png"),
            json!({"results": [{"_links": {"download": "/download/attachments/3/my%20diagram.png?version=2"}}]}),
        ));
        let link = client(&t)
            .find_attachment_download(&PageId::new("3"), "my diagram.png")
            .unwrap();
        assert_eq!(
            link.as_deref(),
            Some("https://acme.atlassian.net/wiki/download/attachments/3/my%20diagram.png?version=2")
        );
    }

    #[test]
    fn attachment_lookup_without_results_is_none() {
        let t = Arc::new(ScriptedTransport::new().json(
            &format!("{BASE}/rest/api/content/3/child/attachment?filename=gone.pdf"),
            json!({"results": []}),
        ));
        assert!(client(&t)
            .find_attachment_download(&PageId::new("3"), "gone.pdf")
            .unwrap()
            .is_none());
    }

    #[test]
    fn download_sends_anti_csrf_header() {
        let url = "https://acme.atlassian.net/wiki/download/attachments/3/a.png";
        let t = Arc::new(ScriptedTransport::new().route(url, 200, b"PNG".to_vec()));
        assert_eq!(client(&t).download(url).unwrap(), b"PNG");
        let headers = t.headers_for(url).unwrap();
        assert!(headers.contains(&("X-Atlassian-Token".to_string(), "no-check".to_string())));
    }

    #[test]
    fn invalid_base_url_rejected() {
        let t = Arc::new(ScriptedTransport::new());
        let res = ConfluenceClient::new("not a url", Box::new(Arc::clone(&t)));
        assert!(matches!(res, Err(MirrorError::InvalidUrl { .. })));
    }
}
