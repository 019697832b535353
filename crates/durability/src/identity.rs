//! File identity resolution
//!
//! Reads filesystem metadata to produce `NodeId`s and `FileIdentity`s.
//! Symlinks are followed, so the identity is that of the file a path
//! ultimately names.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use snaplink_core::{FileIdentity, LinkResult, NodeId};

/// Node identity of the file at `path`
pub fn resolve_node(path: &Path) -> LinkResult<NodeId> {
    let metadata = fs::metadata(path)?;
    Ok(node_from(&metadata)?)
}

/// Node identity and modification time of the file at `path`
pub fn resolve_identity(path: &Path) -> LinkResult<FileIdentity> {
    let metadata = fs::metadata(path)?;
    let node = node_from(&metadata)?;
    Ok(FileIdentity::new(node, mtime_millis(&metadata)?))
}

/// `"{node}-{mtime_millis}"` for the file at `path`
pub fn identity_token(path: &Path) -> LinkResult<String> {
    Ok(resolve_identity(path)?.token())
}

/// True if both paths name the same underlying file
pub fn same_file(a: &Path, b: &Path) -> LinkResult<bool> {
    Ok(resolve_node(a)? == resolve_node(b)?)
}

/// True if both directory entries are hard links to one node
///
/// Unlike [`same_file`], symlinks are not followed: a symlink pointing at
/// `b` is a different entry from `b`.
pub fn same_entry(a: &Path, b: &Path) -> LinkResult<bool> {
    let a = node_from(&fs::symlink_metadata(a)?)?;
    let b = node_from(&fs::symlink_metadata(b)?)?;
    Ok(a == b)
}

#[cfg(unix)]
fn node_from(metadata: &Metadata) -> io::Result<NodeId> {
    use std::os::unix::fs::MetadataExt;
    Ok(NodeId::new(metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn node_from(_metadata: &Metadata) -> io::Result<NodeId> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "file node identity is not available on this platform",
    ))
}

fn mtime_millis(metadata: &Metadata) -> io::Result<i64> {
    let modified = metadata.modified()?;
    Ok(match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    })
}
