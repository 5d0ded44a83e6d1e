//! Confluence REST API access: pages, child listings, attachments, downloads.

mod client;
mod cursor;
mod types;

pub use client::{ConfluenceClient, ANTI_CSRF_HEADER};
pub use cursor::{Cursor, CursorGuard};
pub use types::{Page, PageId, PageSummary};
