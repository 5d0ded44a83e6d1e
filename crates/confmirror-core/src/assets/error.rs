//! Failures resolving a single asset.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::MirrorError;
use crate::http::FetchError;

#[derive(Debug, Error)]
pub enum AssetError {
    /// The attachment lookup found no attachment or no download link.
    #[error("attachment {filename:?} not found on page {page_id}")]
    NotFound { filename: String, page_id: String },

    /// A download link was known but fetching its bytes failed.
    #[error("download failed")]
    Download(#[source] FetchError),

    /// The attachment metadata lookup itself failed.
    #[error("attachment lookup failed")]
    Lookup(#[source] MirrorError),

    /// No local file name can be derived for the source.
    #[error("no usable file name in {source_url:?}")]
    Unresolvable { source_url: String },

    /// Creating the kind directory or writing the file failed.
    #[error("cannot write {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    /// Splits contained failures (recorded as diagnostics) from failures
    /// that must abort the page.
    pub fn into_fatal(self) -> Result<AssetError, MirrorError> {
        match self {
            AssetError::Filesystem { path, source } => Err(MirrorError::Filesystem { path, source }),
            other => Ok(other),
        }
    }
}
