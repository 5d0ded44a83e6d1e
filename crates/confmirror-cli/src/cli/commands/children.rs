//! `confmirror children` – list the direct children of a page.

use anyhow::{Context, Result};
use confmirror_core::config::MirrorConfig;
use confmirror_core::PageId;

use super::connect;

pub fn run_children(cfg: &MirrorConfig, id: &str) -> Result<()> {
    let client = connect(cfg)?;
    let page_id = PageId::new(id.trim());
    let children = client
        .fetch_children(&page_id)
        .with_context(|| format!("list children of page {}", page_id))?;

    if children.is_empty() {
        println!("Page {} has no children.", page_id);
    } else {
        println!("{:<14} {}", "ID", "TITLE");
        for child in children {
            println!("{:<14} {}", child.id.as_str(), child.title);
        }
    }
    Ok(())
}
