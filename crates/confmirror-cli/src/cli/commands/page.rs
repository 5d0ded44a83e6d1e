//! `confmirror page` – export a single page.

use anyhow::{Context, Result};
use confmirror_core::config::MirrorConfig;
use confmirror_core::walker::{TreeWalker, WalkOptions};
use confmirror_core::PageId;

use super::connect;

pub fn run_page(cfg: &MirrorConfig, id: &str) -> Result<()> {
    let client = connect(cfg)?;
    let walker = TreeWalker::new(&client, WalkOptions::from_config(cfg));
    let page_id = PageId::new(id.trim());

    let outcome = walker
        .export_page(&page_id, &cfg.output_dir)
        .with_context(|| format!("export of page {} failed", page_id))?;
    println!(
        "Saved {} ({} asset(s))",
        outcome.document.display(),
        outcome.assets.len()
    );
    for d in &outcome.diagnostics {
        eprintln!("  {}", d);
    }
    Ok(())
}
