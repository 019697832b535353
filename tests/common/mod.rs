//! Shared test utilities for the integration suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use snaplink::LinkConfig;
use tempfile::TempDir;

static INIT_TRACING: Once = Once::new();

/// Route tracing output through the test harness
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Config used by every integration test: no fsync, temp files in `scratch`
pub fn test_config(scratch: &Path) -> LinkConfig {
    LinkConfig::for_testing().with_temp_dir(scratch)
}

/// A live database directory with an active checkpoint and older snapshots
///
/// ```text
/// <root>/
/// ├── db.checkpoints/om.db_cp/   # active checkpoint
/// └── db.snapshots/<name>/       # previous snapshots
/// ```
pub struct LiveDb {
    pub dir: TempDir,
}

impl LiveDb {
    pub fn new() -> Self {
        let db = LiveDb {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(db.checkpoint()).unwrap();
        db
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Byte length to strip so manifest paths are relative to the root
    pub fn prefix_len(&self) -> usize {
        self.root().to_str().unwrap().len() + 1
    }

    pub fn checkpoint(&self) -> PathBuf {
        self.root().join("db.checkpoints").join("om.db_cp")
    }

    pub fn snapshot(&self, name: &str) -> PathBuf {
        self.root().join("db.snapshots").join(name)
    }

    /// Write a data file into the active checkpoint
    pub fn write_active(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.checkpoint().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write a file that only exists in snapshot `snap`
    pub fn write_snapshot_file(&self, snap: &str, name: &str, contents: &[u8]) -> PathBuf {
        let dir = self.snapshot(snap);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Add an active file to snapshot `snap` by hard link (shared data)
    pub fn share_into_snapshot(&self, snap: &str, name: &str) -> PathBuf {
        let dir = self.snapshot(snap);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::hard_link(self.checkpoint().join(name), &path).unwrap();
        path
    }
}

/// Copy `from` to `to`, creating parents; stands in for archive transfer
pub fn copy_file(from: &Path, to: &Path) {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::copy(from, to).unwrap();
}
