//! `confmirror config` – show where the config lives and what is in effect.

use anyhow::Result;
use confmirror_core::config::{self, MirrorConfig};

pub fn run_config(cfg: &MirrorConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    match confmirror_core::logging::log_file_path() {
        Ok(path) => println!("log file:    {}", path.display()),
        Err(e) => println!("log file:    unavailable ({:#})", e),
    }
    println!();
    println!("base_url          = {}", cfg.base_url);
    println!("root_page_id      = {}", cfg.root_page_id);
    println!("output_dir        = {}", cfg.output_dir.display());
    println!("email             = {}", cfg.email);
    println!("api_key           = {:?}", cfg.api_key);
    println!("site_root         = {}", cfg.effective_site_root());
    println!("viewer_macros     = {}", cfg.viewer_macros.join(", "));
    println!("page_limit        = {}", cfg.page_limit);
    println!("max_listing_pages = {}", cfg.max_listing_pages);
    println!("fail_fast         = {}", cfg.fail_fast);
    println!(
        "max_depth         = {}",
        cfg.max_depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unlimited".to_string())
    );
    println!(
        "timeouts          = connect {}s, total {}s",
        cfg.connect_timeout_secs, cfg.timeout_secs
    );
    if cfg.uses_placeholder_credentials() {
        println!();
        println!("credentials are placeholders; set CONFLUENCE_EMAIL and CONFLUENCE_API_KEY");
    }
    Ok(())
}
