//! What a walk produced: saved pages, contained asset failures, skipped subtrees.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::api::PageId;
use crate::assets::ResolvedAsset;
use crate::error::MirrorError;

/// A contained asset failure. The page was still written with the original
/// markup kept for this reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub page_id: PageId,
    /// Human description of the embed (see `AssetRef`'s `Display`).
    pub reference: String,
    /// Error message including its source chain.
    pub message: String,
}

impl Diagnostic {
    pub fn new(page_id: &PageId, reference: impl fmt::Display, error: &dyn Error) -> Self {
        Self {
            page_id: page_id.clone(),
            reference: reference.to_string(),
            message: error_chain(error),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}: {}: {}", self.page_id, self.reference, self.message)
    }
}

/// Result of saving one page.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub page_id: PageId,
    pub title: String,
    pub page_dir: PathBuf,
    pub document: PathBuf,
    pub assets: Vec<ResolvedAsset>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A child subtree that was skipped because saving it failed.
#[derive(Debug)]
pub struct SubtreeFailure {
    pub page_id: PageId,
    pub title: String,
    pub error: MirrorError,
}

impl fmt::Display for SubtreeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subtree {:?} ({}) skipped: {}",
            self.title,
            self.page_id,
            error_chain(&self.error)
        )
    }
}

/// Progress notification passed to a walk observer.
#[derive(Debug)]
pub enum WalkEvent<'a> {
    PageStarted { page_id: &'a PageId, depth: usize },
    PageSaved { outcome: &'a PageOutcome, depth: usize },
    SubtreeFailed { failure: &'a SubtreeFailure },
}

#[derive(Debug, Default)]
pub struct WalkReport {
    pub pages_written: usize,
    pub assets_saved: usize,
    pub asset_bytes: u64,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<SubtreeFailure>,
    /// Children not visited because of the depth limit.
    pub skipped_by_depth: usize,
}

impl WalkReport {
    pub(crate) fn record(&mut self, outcome: PageOutcome) {
        self.pages_written += 1;
        self.assets_saved += outcome.assets.len();
        self.asset_bytes += outcome.assets.iter().map(|a| a.bytes as u64).sum::<u64>();
        self.diagnostics.extend(outcome.diagnostics);
    }

    /// True when every page and every asset was saved.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty() && self.failures.is_empty() && self.skipped_by_depth == 0
    }
}

/// `outer: inner: innermost`, like anyhow's `{:#}`.
pub(crate) fn error_chain(error: &dyn Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}
