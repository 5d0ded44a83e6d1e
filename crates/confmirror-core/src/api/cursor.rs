//! Cursor-based pagination: absolutized `_links.next` plus a termination guard.

use std::collections::HashSet;

use crate::error::PaginationError;
use crate::url_model::absolutize_api_link;

/// Absolute URL of the next listing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Cursor for the first page of a listing.
    pub fn start(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Cursor from a `_links.next` value; relative links are appended to `base_url`.
    pub fn from_next_link(base_url: &str, link: &str) -> Self {
        Self(absolutize_api_link(base_url, link))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rejects cursors already followed and listings longer than `max_pages`.
#[derive(Debug)]
pub struct CursorGuard {
    page_id: String,
    max_pages: usize,
    seen: HashSet<Cursor>,
}

impl CursorGuard {
    pub fn new(page_id: impl Into<String>, max_pages: usize) -> Self {
        Self {
            page_id: page_id.into(),
            max_pages,
            seen: HashSet::new(),
        }
    }

    /// Records `cursor` as about to be requested.
    pub fn admit(&mut self, cursor: &Cursor) -> Result<(), PaginationError> {
        if self.seen.contains(cursor) {
            return Err(PaginationError::CursorRepeated {
                page_id: self.page_id.clone(),
                cursor: cursor.as_str().to_string(),
            });
        }
        if self.seen.len() >= self.max_pages {
            return Err(PaginationError::TooManyPages {
                page_id: self.page_id.clone(),
                limit: self.max_pages,
            });
        }
        self.seen.insert(cursor.clone());
        Ok(())
    }

    pub fn pages_followed(&self) -> usize {
        self.seen.len()
    }
}
