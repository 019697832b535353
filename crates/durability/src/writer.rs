//! Hard-link manifest writer
//!
//! Turns a destination -> source map of absolute paths into manifest text
//! and writes it to a uniquely named temporary file. The caller (or
//! [`ManifestWriter::install`]) then moves it to the well-known manifest
//! location inside the snapshot directory.
//!
//! # Path rewriting
//!
//! Both paths lose their first `prefix_len` bytes. A source that then starts
//! with the active checkpoint marker is reduced to its file name; any other
//! source keeps its relative subpath:
//!
//! ```text
//! snap1/000012.sst    000012.sst                        (active db)
//! snap1/000013.sst    db.snapshots/snap-0/000013.sst    (older snapshot)
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use snaplink_core::{
    collapse_active_source, truncate_path, LinkEntry, LinkError, LinkManifest, LinkResult,
};
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::fsutil::{create_dir_all, sync_dir};

/// Writes and installs link manifests
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    config: LinkConfig,
}

impl ManifestWriter {
    /// Create a writer; the configuration is validated up front
    pub fn new(config: LinkConfig) -> LinkResult<Self> {
        config.validate()?;
        Ok(ManifestWriter { config })
    }

    /// Writer configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Build the in-memory manifest for `entries` (destination -> source)
    pub fn manifest_for(
        &self,
        prefix_len: usize,
        entries: &BTreeMap<PathBuf, PathBuf>,
    ) -> LinkResult<LinkManifest> {
        let mut manifest = LinkManifest::new();
        for (destination, source) in entries {
            let source = truncate_path(prefix_len, source)?;
            let source = collapse_active_source(&source, &self.config.active_checkpoint_marker);
            let destination = truncate_path(prefix_len, destination)?;
            manifest.push(LinkEntry::new(destination, source)?);
        }
        Ok(manifest)
    }

    /// Write a manifest for `entries` to a new temporary file
    ///
    /// Returns the temporary file's path. Nothing is left on disk if any
    /// step fails.
    pub fn build_manifest(
        &self,
        prefix_len: usize,
        entries: &BTreeMap<PathBuf, PathBuf>,
    ) -> LinkResult<PathBuf> {
        let manifest = self.manifest_for(prefix_len, entries)?;

        let mut temp = tempfile::Builder::new()
            .prefix(&self.config.temp_prefix)
            .suffix(&self.config.temp_suffix)
            .tempfile_in(self.config.temp_location())?;
        temp.write_all(manifest.to_text().as_bytes())?;
        temp.flush()?;
        if self.config.sync {
            temp.as_file().sync_all()?;
        }
        let (_, path) = temp.keep().map_err(|e| e.error)?;

        debug!(
            target: "snaplink::writer",
            path = %path.display(),
            entries = manifest.len(),
            "Wrote link manifest"
        );
        Ok(path)
    }

    /// Move a written manifest to `target_dir/<manifest_name>`
    ///
    /// The manifest is hard-linked into place, which fails rather than
    /// replacing a manifest that has not been applied yet. When the temp
    /// directory is on another filesystem the file is copied next to the
    /// target first and linked from there.
    pub fn install(&self, manifest: &Path, target_dir: &Path) -> LinkResult<PathBuf> {
        let final_path = self.config.manifest_path(target_dir);
        create_dir_all(target_dir)?;

        match fs::hard_link(manifest, &final_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(LinkError::ManifestExists { path: final_path });
            }
            Err(e) => {
                debug!(
                    target: "snaplink::writer",
                    from = %manifest.display(),
                    error = %e,
                    "Link failed, copying manifest into place"
                );
                let staging = target_dir.join(format!(".{}.tmp", self.config.manifest_name));
                let placed = self.copy_into_place(manifest, &staging, &final_path);
                let _ = fs::remove_file(&staging);
                placed?;
            }
        }
        fs::remove_file(manifest)?;

        if self.config.sync {
            sync_dir(target_dir)?;
        }

        info!(
            target: "snaplink::writer",
            path = %final_path.display(),
            "Installed link manifest"
        );
        Ok(final_path)
    }

    fn copy_into_place(&self, from: &Path, staging: &Path, final_path: &Path) -> LinkResult<()> {
        fs::copy(from, staging)?;
        if self.config.sync {
            File::open(staging)?.sync_all()?;
        }
        fs::hard_link(staging, final_path).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                LinkError::ManifestExists {
                    path: final_path.to_path_buf(),
                }
            } else {
                LinkError::Io(e)
            }
        })
    }
}

/// Write a manifest with the default configuration
///
/// See [`ManifestWriter::build_manifest`].
pub fn build_manifest(
    prefix_len: usize,
    entries: &BTreeMap<PathBuf, PathBuf>,
) -> LinkResult<PathBuf> {
    ManifestWriter::new(LinkConfig::default())?.build_manifest(prefix_len, entries)
}
