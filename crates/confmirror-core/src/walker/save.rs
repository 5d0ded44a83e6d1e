//! The single-page save step: scan, resolve, rewrite, format, write.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::report::{Diagnostic, PageOutcome};
use crate::api::{ConfluenceClient, Page};
use crate::assets::{AssetResolver, AssetSource, SourceRules};
use crate::error::{MirrorError, Result};
use crate::format::format_document;
use crate::markup::{rewrite, AssetKind, Replacement, Scanner};
use crate::url_model::page_stem;

/// Writes `page` to `{parent_dir}/{stem}/{stem}.md` together with every
/// asset it embeds, where `stem` is `{sanitized-title}_{id}`.
///
/// Asset failures are recorded as diagnostics and leave the original markup
/// in place; only filesystem and formatting failures abort the page.
pub fn save_page(
    client: &ConfluenceClient,
    scanner: &Scanner,
    rules: &SourceRules,
    page: &Page,
    parent_dir: &Path,
) -> Result<PageOutcome> {
    let stem = page_stem(&page.title, page.id.as_str());
    let page_dir = parent_dir.join(&stem);
    fs::create_dir_all(&page_dir).map_err(MirrorError::filesystem(&page_dir))?;

    let resolver = AssetResolver::new(client, &page.id, &page_dir);
    // Keyed by kind too: an attachment shown as an image and linked as a
    // file is saved once under each directory.
    let mut saved: HashMap<(AssetKind, AssetSource), String> = HashMap::new();
    let mut replacements = Vec::new();
    let mut assets = Vec::new();
    let mut diagnostics = Vec::new();

    for embed in scanner.scan(&page.body) {
        let Some(source) = AssetSource::plan(&embed.reference, rules) else {
            tracing::debug!(page_id = %page.id, reference = %embed.reference, "left unresolved");
            continue;
        };
        let key = (embed.reference.kind(), source);
        if let Some(local_path) = saved.get(&key) {
            replacements.push(Replacement::for_embed(&embed, local_path));
            continue;
        }
        match resolver.resolve(&embed.reference, &key.1) {
            Ok(asset) => {
                replacements.push(Replacement::for_embed(&embed, &asset.local_path));
                saved.insert(key, asset.local_path.clone());
                assets.push(asset);
            }
            Err(err) => {
                let contained = err.into_fatal()?;
                let diagnostic = Diagnostic::new(&page.id, &embed.reference, &contained);
                tracing::warn!("{}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    let markup = rewrite::apply(&page.body, &replacements);
    let document = format_document(&page.title, &markup).map_err(|source| MirrorError::Format {
        page_id: page.id.to_string(),
        source,
    })?;
    let document_path = page_dir.join(format!("{}.md", stem));
    fs::write(&document_path, document).map_err(MirrorError::filesystem(&document_path))?;

    tracing::info!(
        page_id = %page.id,
        title = %page.title,
        assets = assets.len(),
        diagnostics = diagnostics.len(),
        "saved {}",
        document_path.display()
    );

    Ok(PageOutcome {
        page_id: page.id.clone(),
        title: page.title.clone(),
        page_dir,
        document: document_path,
        assets,
        diagnostics,
    })
}
