//! snaplink - copy-free snapshot materialization
//!
//! Snapshots of a storage engine checkpoint share most of their data files.
//! Instead of copying those files into every snapshot or backup directory,
//! snaplink records which destination should become a hard link to which
//! source, persists that list as a manifest, and replays it later, possibly
//! after the directory has been packaged and moved to another machine.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::collections::BTreeMap;
//! use snaplink::{apply_manifest, LinkConfig, ManifestWriter};
//!
//! let writer = ManifestWriter::new(LinkConfig::default())?;
//! let manifest = writer.build_manifest(root_len + 1, &links)?;
//! writer.install(&manifest, &packaged_dir)?;
//!
//! // ... transfer packaged_dir ...
//!
//! let report = apply_manifest(&received_dir, true)?;
//! ```
//!
//! # Components
//!
//! - [`resolve_node`] / [`identity_token`]: file identity for change detection
//! - [`ManifestWriter`]: write and install link manifests
//! - [`ManifestApplier`]: replay a manifest into hard links
//! - [`mirror_tree`]: hard-link a whole directory tree

pub use snaplink_core::{
    collapse_active_source, truncate_path, FileIdentity, LinkEntry, LinkError, LinkManifest,
    LinkResult, MalformedLine, NodeId, ParsedManifest, ACTIVE_CHECKPOINT_DIR, FIELD_SEPARATOR,
    HARDLINK_MANIFEST_NAME, MANIFEST_TEMP_PREFIX, MANIFEST_TEMP_SUFFIX,
};
pub use snaplink_durability::{
    apply_manifest, build_manifest, identity_token, mirror_tree, resolve_identity, resolve_node,
    same_entry, same_file, ApplyReport, ExistingLinkPolicy, LinkConfig, ManifestApplier,
    ManifestWriter, MirrorReport,
};
