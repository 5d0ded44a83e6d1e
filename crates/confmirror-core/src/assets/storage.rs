//! Writing asset bytes under a page directory.
//!
//! Files are written to a `.part` sibling and renamed into place, so a rerun
//! never leaves a truncated asset behind.

use std::fs;
use std::path::{Path, PathBuf};

use super::AssetError;
use crate::markup::AssetKind;

/// Temporary file suffix used before the rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.png` → `a.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `bytes` to `{page_dir}/{kind dir}/{file_name}`, creating the kind
/// directory first if it does not exist yet. Returns the final path.
pub fn write_asset(
    page_dir: &Path,
    kind: AssetKind,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, AssetError> {
    let dir = page_dir.join(kind.dir_name());
    if !dir.is_dir() {
        fs::create_dir_all(&dir).map_err(|source| AssetError::Filesystem {
            path: dir.clone(),
            source,
        })?;
    }
    let final_path = dir.join(file_name);
    let tmp = temp_path(&final_path);
    fs::write(&tmp, bytes).map_err(|source| AssetError::Filesystem {
        path: tmp.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&tmp, &final_path) {
        let _ = fs::remove_file(&tmp);
        return Err(AssetError::Filesystem {
            path: final_path,
            source,
        });
    }
    Ok(final_path)
}
