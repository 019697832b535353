//! Durability layer for snaplink
//!
//! This crate handles everything that touches disk:
//!
//! - Identity: resolve a path to its node id and mtime
//! - Writer: produce a temporary hard-link manifest and install it
//! - Applier: replay a manifest into hard links, then clean up
//! - Mirror: hard-link a whole directory tree into another
//! - Config: manifest naming, temp location, fsync and replay policy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod applier; // Manifest replay
pub mod config; // LinkConfig and ExistingLinkPolicy
mod fsutil;
pub mod identity; // Node id / mtime resolution
pub mod mirror; // Whole-tree hard-link mirror
pub mod writer; // Manifest creation and installation

pub use applier::{apply_manifest, ApplyReport, ManifestApplier};
pub use config::{ExistingLinkPolicy, LinkConfig};
pub use identity::{identity_token, resolve_identity, resolve_node, same_entry, same_file};
pub use mirror::{mirror_tree, MirrorReport};
pub use writer::{build_manifest, ManifestWriter};

pub use snaplink_core::{LinkError, LinkResult};
