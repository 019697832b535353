//! Small filesystem helpers shared by the writer, applier, and mirror

use std::fs;
use std::io;
use std::path::Path;

use snaplink_core::{LinkError, LinkResult};

/// `fs::create_dir_all`, reporting the directory on failure
pub(crate) fn create_dir_all(dir: &Path) -> LinkResult<()> {
    fs::create_dir_all(dir).map_err(|source| LinkError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Create the parent directory of `path` (and its ancestors) if missing
pub(crate) fn ensure_parent(path: &Path) -> LinkResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// fsync a directory so renames and new entries in it are durable
#[cfg(unix)]
pub(crate) fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(crate) fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
