//! Configuration: defaults, `config.toml`, `.env`/environment, CLI overrides.
//!
//! Credentials are never read from or written to the config file; they come
//! from the environment (or a `.env` file) only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::Credentials;
use crate::url_model;

pub const ENV_BASE_URL: &str = "CONFLUENCE_BASE_URL";
pub const ENV_ROOT_PAGE_ID: &str = "CONFLUENCE_ROOT_PAGE_ID";
pub const ENV_EMAIL: &str = "CONFLUENCE_EMAIL";
pub const ENV_API_KEY: &str = "CONFLUENCE_API_KEY";
pub const ENV_OUTPUT_DIR: &str = "CONFLUENCE_OUTPUT_DIR";

const DEFAULT_BASE_URL: &str = "https://your-domain.atlassian.net/wiki";
const DEFAULT_ROOT_PAGE_ID: &str = "123456";
const DEFAULT_EMAIL: &str = "your-email@domain.com";
const DEFAULT_API_KEY: &str = "your-api-key";
const DEFAULT_OUTPUT_DIR: &str = "confluence_backup";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

/// API token; `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

fn default_email() -> String {
    DEFAULT_EMAIL.to_string()
}

fn default_api_key() -> Secret {
    Secret::new(DEFAULT_API_KEY)
}

fn default_page_limit() -> u32 {
    100
}

fn default_max_listing_pages() -> usize {
    10_000
}

fn default_viewer_macros() -> Vec<String> {
    ["view-file", "viewpdf", "viewdoc", "viewxls", "viewppt"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    300
}

/// Global configuration loaded from `~/.config/confmirror/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// API base including the context path, e.g. `https://acme.atlassian.net/wiki`.
    pub base_url: String,
    /// Page the export starts from.
    pub root_page_id: String,
    /// Directory the page tree is written under.
    pub output_dir: PathBuf,
    /// Account e-mail used for basic auth (environment only).
    #[serde(skip, default = "default_email")]
    pub email: String,
    /// API token used for basic auth (environment only).
    #[serde(skip, default = "default_api_key")]
    pub api_key: Secret,
    /// `limit` requested per child-listing page.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Upper bound on listing pages followed for one parent.
    #[serde(default = "default_max_listing_pages")]
    pub max_listing_pages: usize,
    /// Path prefix marking site-relative `<img src>` values. Defaults to the
    /// path of `base_url`.
    #[serde(default)]
    pub site_root: Option<String>,
    /// Macro names treated as inline file viewers.
    #[serde(default = "default_viewer_macros")]
    pub viewer_macros: Vec<String>,
    /// Abort the whole run on the first failing page instead of skipping
    /// that page's subtree.
    #[serde(default)]
    pub fail_fast: bool,
    /// Deepest level exported below the root (root = 0). None = unlimited.
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            root_page_id: DEFAULT_ROOT_PAGE_ID.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            email: default_email(),
            api_key: default_api_key(),
            page_limit: default_page_limit(),
            max_listing_pages: default_max_listing_pages(),
            site_root: None,
            viewer_macros: default_viewer_macros(),
            fail_fast: false,
            max_depth: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            retry: None,
        }
    }
}

impl MirrorConfig {
    /// Overrides fields from `CONFLUENCE_*` variables of the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overrides fields from `lookup`; empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = get(ENV_ROOT_PAGE_ID) {
            self.root_page_id = v;
        }
        if let Some(v) = get(ENV_EMAIL) {
            self.email = v;
        }
        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = Secret::new(v);
        }
        if let Some(v) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(v);
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.api_key.expose().to_string())
    }

    /// Configured site root, or the path of `base_url`.
    pub fn effective_site_root(&self) -> String {
        self.site_root
            .clone()
            .unwrap_or_else(|| url_model::default_site_root(&self.base_url))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks values that would otherwise only fail on the first request.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .with_context(|| format!("base_url {:?} is not a valid URL", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("base_url must use http or https, got {:?}", self.base_url);
        }
        if self.root_page_id.trim().is_empty() {
            anyhow::bail!("root page id is empty");
        }
        if self.page_limit == 0 {
            anyhow::bail!("page_limit must be at least 1");
        }
        Ok(())
    }

    /// True while any of the credential placeholders is still in place.
    pub fn uses_placeholder_credentials(&self) -> bool {
        self.email == DEFAULT_EMAIL || self.api_key.expose() == DEFAULT_API_KEY
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("confmirror")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<MirrorConfig> {
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: MirrorConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Loads `.env` from the working directory (if any) into the process
/// environment. Existing variables win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env file: {}", e),
    }
}
