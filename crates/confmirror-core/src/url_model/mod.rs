//! URL modeling and local name derivation.
//!
//! Turns API links and markup sources into absolute URLs, and page titles,
//! attachment names and URL paths into names that are safe as a single path
//! component.

mod absolutize;
mod path;
mod sanitize;

pub use absolutize::{absolutize_api_link, default_site_root, has_scheme, resolve_markup_src};
pub use path::basename_from_url;
pub use sanitize::{page_stem, sanitize_component};
