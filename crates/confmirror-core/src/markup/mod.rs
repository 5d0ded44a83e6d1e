//! Storage-format markup: finding embedded assets and substituting them.
//!
//! Everything here is pure. [`Scanner::scan`] lists the embeds of a page in
//! document order, [`rewrite::apply`] splices replacement markup into the
//! original text. Fetching and writing happen in [`crate::assets`].

mod reference;
pub mod rewrite;
mod scan;

pub use reference::{AssetKind, AssetRef};
pub use rewrite::Replacement;
pub use scan::{Embed, Scanner};
