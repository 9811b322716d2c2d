//! Home-directory shorthand resolution.
//!
//! The file-open layer never expands `~`, so paths are resolved here before
//! they reach [`std::fs::File::open`].

use crate::error::{Error, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Resolve a leading `~` or `~/` against the current user's home directory.
///
/// Other paths, including `~user/...` forms, are returned unchanged.
///
/// # Example
///
/// ```no_run
/// use sheetpeek::path::resolve_home;
///
/// let path = resolve_home("~/Downloads/teach.xlsx")?;
/// assert!(path.is_absolute());
/// # Ok::<(), sheetpeek::Error>(())
/// ```
pub fn resolve_home(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let Some(rest) = home_relative(path) else {
        return Ok(path.to_path_buf());
    };

    let base_dirs = BaseDirs::new().ok_or_else(|| Error::FileNotFound(path.to_path_buf()))?;
    let resolved = base_dirs.home_dir().join(rest);
    log::debug!("resolved {} to {}", path.display(), resolved.display());
    Ok(resolved)
}

/// Resolve `path` against an explicit home directory.
pub fn resolve_home_with(path: impl AsRef<Path>, home: &Path) -> PathBuf {
    let path = path.as_ref();
    match home_relative(path) {
        Some(rest) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Return the part after `~` if `path` starts with the bare home shorthand.
fn home_relative(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(std::path::Component::Normal(first)) if first == "~" => {
            Some(components.as_path().to_path_buf())
        }
        _ => None,
    }
}
