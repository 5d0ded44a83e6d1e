//! Tree Walker: depth-first export of a page and all of its descendants.
//!
//! Each page is saved before its children are listed, and children are
//! visited one at a time in listing order. A failing child subtree is
//! recorded in the [`WalkReport`] and its siblings continue, unless
//! [`WalkOptions::fail_fast`] is set. A failure on the starting page always
//! aborts the walk.

mod report;
mod save;


use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub use report::{Diagnostic, PageOutcome, SubtreeFailure, WalkEvent, WalkReport};
pub use save::save_page;

use crate::api::{ConfluenceClient, PageId};
use crate::assets::SourceRules;
use crate::config::MirrorConfig;
use crate::error::{MirrorError, Result};
use crate::markup::Scanner;

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Path prefix marking site-relative `<img src>` values.
    pub site_root: String,
    pub viewer_macros: Vec<String>,
    pub fail_fast: bool,
    /// Deepest level saved below the starting page (which is level 0).
    pub max_depth: Option<usize>,
}

impl WalkOptions {
    pub fn from_config(cfg: &MirrorConfig) -> Self {
        Self {
            site_root: cfg.effective_site_root(),
            viewer_macros: cfg.viewer_macros.clone(),
            fail_fast: cfg.fail_fast,
            max_depth: cfg.max_depth,
        }
    }
}

pub struct TreeWalker<'a> {
    client: &'a ConfluenceClient,
    scanner: Scanner,
    rules: SourceRules,
    fail_fast: bool,
    max_depth: Option<usize>,
}

/// Mutable state of one walk.
struct WalkState<'o> {
    visited: HashSet<PageId>,
    report: WalkReport,
    observer: &'o mut dyn FnMut(&WalkEvent<'_>),
}

impl<'a> TreeWalker<'a> {
    pub fn new(client: &'a ConfluenceClient, options: WalkOptions) -> Self {
        Self {
            client,
            scanner: Scanner::new(&options.viewer_macros),
            rules: SourceRules {
                base_url: client.base_url().to_string(),
                site_root: options.site_root,
            },
            fail_fast: options.fail_fast,
            max_depth: options.max_depth,
        }
    }

    /// Exports `root` and its descendants under `output_dir`.
    pub fn walk(&self, root: &PageId, output_dir: &Path) -> Result<WalkReport> {
        self.walk_with(root, output_dir, |_| {})
    }

    /// Like [`walk`](Self::walk), calling `observer` as pages start, finish
    /// and fail.
    pub fn walk_with<F>(
        &self,
        root: &PageId,
        output_dir: &Path,
        mut observer: F,
    ) -> Result<WalkReport>
    where
        F: FnMut(&WalkEvent<'_>),
    {
        fs::create_dir_all(output_dir).map_err(MirrorError::filesystem(output_dir))?;
        tracing::info!(root = %root, output = %output_dir.display(), "starting export");

        let mut state = WalkState {
            visited: HashSet::new(),
            report: WalkReport::default(),
            observer: &mut observer,
        };
        self.visit(&mut state, root, output_dir, 0)?;

        let report = state.report;
        tracing::info!(
            pages = report.pages_written,
            assets = report.assets_saved,
            diagnostics = report.diagnostics.len(),
            failed_subtrees = report.failures.len(),
            "export finished"
        );
        Ok(report)
    }

    /// Saves a single page under `output_dir` without visiting its children.
    pub fn export_page(&self, page_id: &PageId, output_dir: &Path) -> Result<PageOutcome> {
        fs::create_dir_all(output_dir).map_err(MirrorError::filesystem(output_dir))?;
        let page = self.client.fetch_page(page_id)?;
        save_page(self.client, &self.scanner, &self.rules, &page, output_dir)
    }

    fn visit(
        &self,
        state: &mut WalkState<'_>,
        page_id: &PageId,
        parent_dir: &Path,
        depth: usize,
    ) -> Result<()> {
        if !state.visited.insert(page_id.clone()) {
            return Err(MirrorError::CycleDetected {
                page_id: page_id.to_string(),
            });
        }
        (state.observer)(&WalkEvent::PageStarted { page_id, depth });

        let page = self.client.fetch_page(page_id)?;
        let outcome = save_page(self.client, &self.scanner, &self.rules, &page, parent_dir)?;
        (state.observer)(&WalkEvent::PageSaved {
            outcome: &outcome,
            depth,
        });
        let page_dir = outcome.page_dir.clone();
        state.report.record(outcome);

        if self.max_depth.is_some_and(|max| depth >= max) {
            self.count_skipped(state, page_id, depth);
            return Ok(());
        }

        let children = self.client.fetch_children(page_id)?;
        for child in children {
            match self.visit(state, &child.id, &page_dir, depth + 1) {
                Ok(()) => {}
                Err(error) if !self.fail_fast => {
                    let failure = SubtreeFailure {
                        page_id: child.id,
                        title: child.title,
                        error,
                    };
                    tracing::warn!("{}", failure);
                    (state.observer)(&WalkEvent::SubtreeFailed { failure: &failure });
                    state.report.failures.push(failure);
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    /// Counts the children left out at the depth limit. The listing is
    /// informational only, so a failure to fetch it is logged and ignored.
    fn count_skipped(&self, state: &mut WalkState<'_>, page_id: &PageId, depth: usize) {
        match self.client.fetch_children(page_id) {
            Ok(children) if !children.is_empty() => {
                tracing::warn!(
                    page_id = %page_id,
                    children = children.len(),
                    depth,
                    "depth limit reached; children not exported"
                );
                state.report.skipped_by_depth += children.len();
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    page_id = %page_id,
                    depth,
                    error = %err,
                    "depth limit reached; could not list skipped children"
                );
            }
        }
    }
}
