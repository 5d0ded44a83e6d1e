//! Error taxonomy for the export pipeline.
//!
//! Page-level failures are [`MirrorError`]s and abort the subtree they occur
//! in. Asset-level failures live in [`crate::assets::AssetError`] and never
//! leave the page being saved, except for filesystem failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::http::FetchError;

pub type Result<T, E = MirrorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MirrorError {
    /// A page, child-listing or attachment lookup request failed.
    #[error(transparent)]
    Remote(#[from] FetchError),

    /// The API answered 2xx but the body did not match the expected shape.
    #[error("unexpected response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// Creating a directory or writing a file failed.
    #[error("filesystem error at {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to convert page {page_id} to Markdown")]
    Format {
        page_id: String,
        #[source]
        source: io::Error,
    },

    #[error("page {page_id} was reached twice; the page hierarchy contains a cycle")]
    CycleDetected { page_id: String },
}

impl MirrorError {
    /// Adapter for `map_err` on filesystem calls.
    pub(crate) fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| MirrorError::Filesystem { path, source }
    }

    /// HTTP status of the failed request, when the failure was a status error.
    pub fn http_status(&self) -> Option<u32> {
        match self {
            MirrorError::Remote(FetchError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Misbehaving cursor-based pagination.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("child listing of page {page_id} repeated cursor {cursor}")]
    CursorRepeated { page_id: String, cursor: String },

    #[error("child listing of page {page_id} exceeded {limit} pages")]
    TooManyPages { page_id: String, limit: usize },
}
