//! Asset Resolver: turns one embed into a file under the page directory.
//!
//! [`AssetSource::plan`] decides, without I/O, where an embed's bytes come
//! from. [`AssetResolver`] performs the lookup, download and write.

mod error;
mod resolver;
mod storage;

pub use error::AssetError;
pub use resolver::{AssetResolver, AssetSource, ResolvedAsset, SourceRules};
pub use storage::{temp_path, write_asset};
