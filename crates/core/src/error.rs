//! Error types for snaplink
//!
//! Structural failures (directories, links, manifest removal) surface as
//! `LinkError`. Data-quality problems in a manifest and post-link cleanup
//! failures are logged by the caller and never become errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for snaplink operations
pub type LinkResult<T> = std::result::Result<T, LinkError>;

/// Errors raised while writing, installing, or applying link manifests
#[derive(Debug, Error)]
pub enum LinkError {
    /// I/O error not tied to a more specific step
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A destination parent directory could not be created
    #[error("Failed to create directory: {}", path.display())]
    CreateDirectory {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Hard link creation failed
    #[error("Failed to link {} -> {}: {source}", to.display(), from.display())]
    Link {
        /// Existing file the link should point at
        from: PathBuf,
        /// New directory entry
        to: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The manifest could not be removed after a successful pass
    #[error("Failed to delete: {}", path.display())]
    DeleteManifest {
        /// Manifest path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A manifest is already waiting to be applied at the install location
    #[error("Manifest already present at {}", path.display())]
    ManifestExists {
        /// Existing manifest path
        path: PathBuf,
    },

    /// Mirror source is missing or is not a directory
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// Offending path
        path: PathBuf,
    },

    /// Directory traversal failed while mirroring
    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        /// Entry (or root) being visited
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Prefix length is longer than the path or splits a character
    #[error("Cannot strip {prefix_len} bytes from {path}")]
    Truncate {
        /// Path rendered as text
        path: String,
        /// Requested prefix length
        prefix_len: usize,
    },

    /// Path cannot be written to a UTF-8 manifest
    #[error("Path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// Offending path
        path: PathBuf,
    },

    /// Path contains a character the manifest format cannot carry
    #[error("Path cannot be stored in a manifest: {0:?}")]
    UnencodablePath(String),

    /// Entry the applier would refuse to replay
    #[error("Invalid link {to:?} -> {from:?}: {reason}")]
    InvalidEntry {
        /// Source as it would be written
        from: String,
        /// Destination as it would be written
        to: String,
        /// Rule the entry breaks
        reason: &'static str,
    },

    /// Configuration rejected by validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl LinkError {
    /// The underlying I/O error, if this error wraps one
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            LinkError::Io(e) => Some(e),
            LinkError::CreateDirectory { source, .. }
            | LinkError::Link { source, .. }
            | LinkError::DeleteManifest { source, .. }
            | LinkError::Walk { source, .. } => Some(source),
            _ => None,
        }
    }
}
