//! Core types for snaplink
//!
//! This crate defines the pure, filesystem-free pieces of the hard-link
//! snapshot protocol:
//! - NodeId / FileIdentity: opaque file identity tokens
//! - LinkEntry / LinkManifest: the tab-separated manifest format
//! - Path helpers: prefix truncation and active-checkpoint collapsing
//! - LinkError: error type shared by every crate in the workspace

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod identity;
pub mod manifest;
pub mod path;

pub use error::{LinkError, LinkResult};
pub use identity::{FileIdentity, NodeId};
pub use manifest::{
    LinkEntry, LinkManifest, MalformedLine, ParsedManifest, ACTIVE_CHECKPOINT_DIR,
    FIELD_SEPARATOR, HARDLINK_MANIFEST_NAME, MANIFEST_TEMP_PREFIX, MANIFEST_TEMP_SUFFIX,
};
pub use path::{collapse_active_source, is_contained_relative, truncate_path};
