//! File identity tokens
//!
//! A `NodeId` names the underlying file a directory entry points at. Two
//! hard links to the same file share a `NodeId`; a copy does not. The token
//! is only meant for equality checks and logging, so it deliberately has
//! no ordering and no numeric accessors.

use std::fmt;

/// Filesystem-assigned identity of a file's data
///
/// On Unix this is the (device, inode) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    device: u64,
    inode: u64,
}

impl NodeId {
    /// Build a node id from raw platform values
    pub fn new(device: u64, inode: u64) -> Self {
        NodeId { device, inode }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(dev={:x},ino={})", self.device, self.inode)
    }
}

/// Node identity plus last modification time
///
/// Changes when the file is rewritten in place, so it doubles as a cheap
/// change-detection key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    /// Underlying node
    pub node: NodeId,
    /// Last modification time, milliseconds since the Unix epoch
    pub modified_millis: i64,
}

impl FileIdentity {
    /// Create a file identity
    pub fn new(node: NodeId, modified_millis: i64) -> Self {
        FileIdentity {
            node,
            modified_millis,
        }
    }

    /// Composite `"{node}-{mtime}"` token
    pub fn token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.node, self.modified_millis)
    }
}
