//! Resolution of one embed: pick the source, fetch the bytes, write the file.

use std::path::Path;

use super::error::AssetError;
use super::storage::write_asset;
use crate::api::{ConfluenceClient, PageId};
use crate::markup::{AssetKind, AssetRef};
use crate::url_model::{basename_from_url, resolve_markup_src, sanitize_component};

/// What a site-relative source is resolved against.
#[derive(Debug, Clone)]
pub struct SourceRules {
    pub base_url: String,
    /// Path prefix marking site-relative `<img src>` values (e.g. `/wiki`).
    pub site_root: String,
}

/// Where the bytes of an embed come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetSource {
    /// Absolute download URL.
    Url(String),
    /// Attachment of the owning page, looked up by name.
    Attachment { filename: String },
}

impl AssetSource {
    /// Source for `reference`, or `None` when it cannot be resolved at all
    /// (e.g. a relative `<img src>` outside the site root). Such embeds are
    /// left untouched without a diagnostic.
    pub fn plan(reference: &AssetRef, rules: &SourceRules) -> Option<Self> {
        match reference {
            AssetRef::DirectUrl { src: url } | AssetRef::ExternalImage { url } => {
                resolve_markup_src(&rules.base_url, &rules.site_root, url).map(AssetSource::Url)
            }
            _ => reference
                .attachment_filename()
                .map(|filename| AssetSource::Attachment {
                    filename: filename.to_string(),
                }),
        }
    }
}

/// A saved asset and the page-relative path markup should point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub reference: AssetRef,
    /// `images/<name>` or `files/<name>`, always with `/`.
    pub local_path: String,
    pub bytes: usize,
}

/// Resolver bound to one page's rewrite pass.
pub struct AssetResolver<'a> {
    client: &'a ConfluenceClient,
    page_id: &'a PageId,
    page_dir: &'a Path,
}

impl<'a> AssetResolver<'a> {
    pub fn new(client: &'a ConfluenceClient, page_id: &'a PageId, page_dir: &'a Path) -> Self {
        Self {
            client,
            page_id,
            page_dir,
        }
    }

    pub fn resolve(
        &self,
        reference: &AssetRef,
        source: &AssetSource,
    ) -> Result<ResolvedAsset, AssetError> {
        let kind = reference.kind();
        let (local_path, bytes) = match source {
            AssetSource::Url(url) => self.resolve_by_url(url, kind)?,
            AssetSource::Attachment { filename } => self.resolve_by_filename(filename, kind)?,
        };
        Ok(ResolvedAsset {
            reference: reference.clone(),
            local_path,
            bytes,
        })
    }

    /// Downloads `url` into the kind directory under the URL's basename.
    pub fn resolve_by_url(&self, url: &str, kind: AssetKind) -> Result<(String, usize), AssetError> {
        let name = basename_from_url(url)
            .map(|n| sanitize_component(&n))
            .ok_or_else(|| AssetError::Unresolvable {
                source_url: url.to_string(),
            })?;
        self.fetch_into(url, kind, &name)
    }

    /// Looks up the attachment `filename` on the owning page and downloads it
    /// into the kind directory under that name.
    pub fn resolve_by_filename(
        &self,
        filename: &str,
        kind: AssetKind,
    ) -> Result<(String, usize), AssetError> {
        let link = self
            .client
            .find_attachment_download(self.page_id, filename)
            .map_err(AssetError::Lookup)?
            .ok_or_else(|| AssetError::NotFound {
                filename: filename.to_string(),
                page_id: self.page_id.to_string(),
            })?;
        self.fetch_into(&link, kind, &sanitize_component(filename))
    }

    fn fetch_into(
        &self,
        url: &str,
        kind: AssetKind,
        name: &str,
    ) -> Result<(String, usize), AssetError> {
        let bytes = self.client.download(url).map_err(AssetError::Download)?;
        let path = write_asset(self.page_dir, kind, name, &bytes)?;
        tracing::debug!(url, path = %path.display(), bytes = bytes.len(), "saved asset");
        Ok((format!("{}/{}", kind.dir_name(), name), bytes.len()))
    }
}
