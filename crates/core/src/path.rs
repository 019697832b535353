//! Path rewriting for link manifests
//!
//! Manifest paths are written relative to a common root by chopping a fixed
//! number of bytes off the front of each absolute path. Sources that live
//! in the active checkpoint directory are further reduced to their bare
//! file name, since the active database is laid out flat in the packaged
//! snapshot.

use std::path::{Component, Path};

use crate::error::{LinkError, LinkResult};

/// Remove the first `prefix_len` bytes of `path`'s UTF-8 rendering
///
/// Fails when the path is not UTF-8, when `prefix_len` is past the end, or
/// when it would split a multi-byte character.
pub fn truncate_path(prefix_len: usize, path: &Path) -> LinkResult<String> {
    let text = path.to_str().ok_or_else(|| LinkError::NonUtf8Path {
        path: path.to_path_buf(),
    })?;
    text.get(prefix_len..)
        .map(str::to_string)
        .ok_or_else(|| LinkError::Truncate {
            path: text.to_string(),
            prefix_len,
        })
}

/// Collapse a truncated source path under the active checkpoint marker
///
/// `checkpoint/dir/a.sst` becomes `a.sst` when `marker` is `checkpoint`.
/// The match is per path component, so `checkpoints/a.sst` is left alone.
/// Paths outside the marker keep their relative subpath so equally named
/// files from different snapshot generations do not collide.
pub fn collapse_active_source(relative: &str, marker: &str) -> String {
    let path = Path::new(relative);
    if path.starts_with(marker) {
        if let Some(name) = path.file_name() {
            return name.to_string_lossy().into_owned();
        }
    }
    relative.to_string()
}

/// True when `relative` is non-empty and stays inside whatever directory it
/// is later joined onto (no root, prefix, or `..` components)
pub fn is_contained_relative(relative: &str) -> bool {
    if relative.is_empty() {
        return false;
    }
    Path::new(relative)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
