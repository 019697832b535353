//! Whole-tree hard-link mirror
//!
//! Recreates every entry under a source directory inside a destination
//! directory: directories are created, everything else is hard-linked.
//! No manifest is involved and there is no per-entry skipping; the first
//! failure aborts the mirror.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use snaplink_core::{LinkError, LinkResult};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::fsutil::ensure_parent;

/// Counts from a completed mirror
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Directories created (or already present) under the destination
    pub directories: usize,
    /// Hard links created
    pub links: usize,
}

/// Hard-link every entry of `source_dir` into `dest_dir`
///
/// Entries are processed in sorted relative-path order, so a directory is
/// always created before anything inside it. Symlinks are not followed;
/// a symlink is linked as itself.
///
/// # Errors
///
/// - `NotADirectory`: `source_dir` is missing or not a directory
/// - `Walk`: the source tree could not be read
/// - `CreateDirectory`: a destination directory could not be created
/// - `Link`: a hard link could not be created (including when the
///   destination already exists)
pub fn mirror_tree(source_dir: &Path, dest_dir: &Path) -> LinkResult<MirrorReport> {
    if !source_dir.is_dir() {
        return Err(LinkError::NotADirectory {
            path: source_dir.to_path_buf(),
        });
    }
    debug!(
        target: "snaplink::mirror",
        from = %source_dir.display(),
        to = %dest_dir.display(),
        "Mirroring directory tree"
    );

    let mut entries = list_relative(source_dir)?;
    entries.sort();

    let mut report = MirrorReport::default();
    for (relative, is_dir) in entries {
        let from = source_dir.join(&relative);
        let to = dest_dir.join(&relative);
        ensure_parent(&to)?;

        if is_dir {
            match fs::create_dir(&to) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && to.is_dir() => {}
                Err(source) => return Err(LinkError::CreateDirectory { path: to, source }),
            }
            report.directories += 1;
        } else {
            fs::hard_link(&from, &to).map_err(|source| LinkError::Link {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            report.links += 1;
        }
    }

    info!(
        target: "snaplink::mirror",
        from = %source_dir.display(),
        to = %dest_dir.display(),
        directories = report.directories,
        links = report.links,
        "Mirrored directory tree"
    );
    Ok(report)
}

/// Every entry below `root` (root excluded) as (relative path, is_dir)
fn list_relative(root: &Path) -> LinkResult<Vec<(PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            LinkError::Walk {
                path,
                source: io::Error::from(e),
            }
        })?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| LinkError::Walk {
                path: entry.path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "entry outside source root"),
            })?
            .to_path_buf();
        entries.push((relative, entry.file_type().is_dir()));
    }
    Ok(entries)
}
