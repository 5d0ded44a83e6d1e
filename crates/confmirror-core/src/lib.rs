pub mod config;
pub mod logging;

pub mod api;
pub mod assets;
pub mod error;
pub mod format;
pub mod http;
pub mod markup;
pub mod retry;
pub mod url_model;
pub mod walker;

pub use api::{ConfluenceClient, PageId};
pub use error::{MirrorError, Result};
pub use walker::{TreeWalker, WalkEvent, WalkOptions, WalkReport};
