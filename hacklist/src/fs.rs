//! File system-related utilities.

use std::path::{Path, PathBuf};

use crate::Error;

/// Canonicalize the given path if it exists. If it does not exist, returns
/// `Ok(None)`.
pub fn maybe_canonicalize<P>(path: P) -> Result<Option<PathBuf>, Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.exists() {
        let canonical = path.canonicalize().map_err(|e| {
            Error::Io(
                format!("while trying to canonicalize {}", path.display()),
                e,
            )
        })?;
        Ok(Some(canonical))
    } else {
        Ok(None)
    }
}

/// Extract the lowercase extension of the given path, if any.
pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}
