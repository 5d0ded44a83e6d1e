//! CLI command handlers, one file per command.

mod children;
mod completions;
mod config;
mod mirror;
mod page;

pub use children::run_children;
pub use completions::run_completions;
pub use config::run_config;
pub use mirror::{run_mirror, MirrorArgs};
pub use page::run_page;

use anyhow::{Context, Result};
use confmirror_core::api::ConfluenceClient;
use confmirror_core::config::MirrorConfig;

/// Validates `cfg` and builds the API client every remote command uses.
fn connect(cfg: &MirrorConfig) -> Result<ConfluenceClient> {
    cfg.validate()?;
    if cfg.uses_placeholder_credentials() {
        tracing::warn!("CONFLUENCE_EMAIL / CONFLUENCE_API_KEY not set; requests will likely be rejected");
        eprintln!("warning: credentials are placeholders; set CONFLUENCE_EMAIL and CONFLUENCE_API_KEY");
    }
    ConfluenceClient::from_config(cfg).context("create API client")
}
