//! `confmirror mirror` – export the whole page tree.

use anyhow::{Context, Result};
use confmirror_core::config::MirrorConfig;
use confmirror_core::walker::{TreeWalker, WalkEvent, WalkOptions, WalkReport};
use confmirror_core::PageId;
use std::path::PathBuf;

use super::connect;

/// Flag overrides for the configured values.
#[derive(Debug, Default)]
pub struct MirrorArgs {
    pub base_url: Option<String>,
    pub root: Option<String>,
    pub output: Option<PathBuf>,
    pub fail_fast: bool,
    pub max_depth: Option<usize>,
}

impl MirrorArgs {
    pub fn apply(self, cfg: &mut MirrorConfig) {
        if let Some(url) = self.base_url {
            cfg.base_url = url;
        }
        if let Some(root) = self.root {
            cfg.root_page_id = root;
        }
        if let Some(dir) = self.output {
            cfg.output_dir = dir;
        }
        if self.fail_fast {
            cfg.fail_fast = true;
        }
        if self.max_depth.is_some() {
            cfg.max_depth = self.max_depth;
        }
    }
}

pub fn run_mirror(cfg: &MirrorConfig) -> Result<()> {
    let client = connect(cfg)?;
    let walker = TreeWalker::new(&client, WalkOptions::from_config(cfg));
    let root = PageId::new(cfg.root_page_id.trim());

    println!(
        "Exporting page {} from {} into {}",
        root,
        client.base_url(),
        cfg.output_dir.display()
    );
    let report = walker
        .walk_with(&root, &cfg.output_dir, print_event)
        .with_context(|| format!("export of page {} failed", root))?;
    print_summary(&report);
    Ok(())
}

fn print_event(event: &WalkEvent<'_>) {
    match event {
        WalkEvent::PageStarted { .. } => {}
        WalkEvent::PageSaved { outcome, depth } => println!(
            "{:indent$}{} ({} asset(s))",
            "",
            outcome.title,
            outcome.assets.len(),
            indent = depth * 2
        ),
        WalkEvent::SubtreeFailed { failure } => eprintln!("  skipped: {}", failure),
    }
}

fn print_summary(report: &WalkReport) {
    println!(
        "Done: {} page(s), {} asset(s), {} byte(s).",
        report.pages_written, report.assets_saved, report.asset_bytes
    );
    if !report.diagnostics.is_empty() {
        eprintln!("{} asset(s) could not be saved:", report.diagnostics.len());
        for d in &report.diagnostics {
            eprintln!("  {}", d);
        }
    }
    if !report.failures.is_empty() {
        eprintln!("{} subtree(s) skipped:", report.failures.len());
        for f in &report.failures {
            eprintln!("  {}", f);
        }
    }
    if report.skipped_by_depth > 0 {
        eprintln!(
            "{} child page(s) below the depth limit were not exported.",
            report.skipped_by_depth
        );
    }
}
