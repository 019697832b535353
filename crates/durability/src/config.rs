//! Link configuration
//!
//! Controls manifest naming, where temporary manifests are written, whether
//! writes are fsynced, and how a replay treats links that already exist.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use snaplink_core::{
    LinkError, LinkResult, ACTIVE_CHECKPOINT_DIR, HARDLINK_MANIFEST_NAME, MANIFEST_TEMP_PREFIX,
    MANIFEST_TEMP_SUFFIX,
};

/// What to do when a manifest destination already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingLinkPolicy {
    /// Accept the entry if the destination is already the source's node.
    /// A destination pointing at a different file is still an error.
    #[default]
    AcceptSameFile,
    /// Any existing destination aborts the pass
    Fail,
}

/// Hard-link manifest configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// File name of the manifest inside a snapshot directory
    pub manifest_name: String,
    /// Leading directory that marks a source as part of the active checkpoint
    pub active_checkpoint_marker: String,
    /// Where temporary manifests are created (system temp dir when `None`)
    pub temp_dir: Option<PathBuf>,
    /// Temporary manifest file name prefix
    pub temp_prefix: String,
    /// Temporary manifest file name suffix
    pub temp_suffix: String,
    /// fsync manifests and their directories after writing
    pub sync: bool,
    /// Replay behaviour for destinations that already exist
    pub existing_links: ExistingLinkPolicy,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            manifest_name: HARDLINK_MANIFEST_NAME.to_string(),
            active_checkpoint_marker: ACTIVE_CHECKPOINT_DIR.to_string(),
            temp_dir: None,
            temp_prefix: MANIFEST_TEMP_PREFIX.to_string(),
            temp_suffix: MANIFEST_TEMP_SUFFIX.to_string(),
            sync: true,
            existing_links: ExistingLinkPolicy::AcceptSameFile,
        }
    }
}

impl LinkConfig {
    /// Create config for testing
    ///
    /// Skips fsync to keep tests fast.
    pub fn for_testing() -> Self {
        LinkConfig {
            sync: false,
            ..Default::default()
        }
    }

    /// Set the manifest file name
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Set the active checkpoint marker
    pub fn with_active_checkpoint_marker(mut self, marker: impl Into<String>) -> Self {
        self.active_checkpoint_marker = marker.into();
        self
    }

    /// Set the temporary manifest directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Enable or disable fsync
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Set the existing-destination policy
    pub fn with_existing_links(mut self, policy: ExistingLinkPolicy) -> Self {
        self.existing_links = policy;
        self
    }

    /// Manifest location for a snapshot directory
    pub fn manifest_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.manifest_name)
    }

    /// Directory temporary manifests are created in
    pub fn temp_location(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Validate configuration
    pub fn validate(&self) -> LinkResult<()> {
        let mut name = Path::new(&self.manifest_name).components();
        match (name.next(), name.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(LinkError::InvalidConfig(format!(
                    "manifest name must be a plain file name: {:?}",
                    self.manifest_name
                )))
            }
        }

        let marker = Path::new(&self.active_checkpoint_marker);
        if self.active_checkpoint_marker.is_empty() || marker.is_absolute() {
            return Err(LinkError::InvalidConfig(format!(
                "active checkpoint marker must be a relative path: {:?}",
                self.active_checkpoint_marker
            )));
        }

        if self.temp_prefix.is_empty() {
            return Err(LinkError::InvalidConfig(
                "temporary manifest prefix is empty".to_string(),
            ));
        }

        Ok(())
    }
}
