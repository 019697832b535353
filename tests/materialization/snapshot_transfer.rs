//! Snapshot Transfer Tests
//!
//! Package a snapshot with a link manifest instead of duplicate files,
//! move it, and materialize the links at the destination.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use snaplink::{same_file, LinkError, ManifestApplier, ManifestWriter};
use tempfile::TempDir;

use crate::common::*;

/// Live db with two snapshots:
/// - snap-1 shares 000001.sst with the active checkpoint and owns 000000.sst
/// - snap-2 shares 000000.sst with snap-1
fn live_with_snapshots() -> LiveDb {
    let db = LiveDb::new();
    db.write_active("000001.sst", b"sst-1");
    db.write_active("000002.sst", b"sst-2");
    db.write_active("CURRENT", b"MANIFEST-000003\n");
    db.share_into_snapshot("snap-1", "000001.sst");
    db.write_snapshot_file("snap-1", "000000.sst", b"sst-0");
    db
}

/// Links for the package: every shared file points at the copy that is
/// physically included
fn planned_links(db: &LiveDb) -> BTreeMap<PathBuf, PathBuf> {
    let mut links = BTreeMap::new();
    links.insert(
        db.snapshot("snap-1").join("000001.sst"),
        db.checkpoint().join("000001.sst"),
    );
    links.insert(
        db.snapshot("snap-2").join("000000.sst"),
        db.snapshot("snap-1").join("000000.sst"),
    );
    links
}

/// Physically included files: active checkpoint flat at the root, snapshot
/// files under their relative path
fn package(db: &LiveDb, out: &Path) {
    for name in ["000001.sst", "000002.sst", "CURRENT"] {
        copy_file(&db.checkpoint().join(name), &out.join(name));
    }
    copy_file(
        &db.snapshot("snap-1").join("000000.sst"),
        &out.join("db.snapshots/snap-1/000000.sst"),
    );
}

#[test]
fn manifest_lines_collapse_active_sources_only() {
    init_tracing();
    let db = live_with_snapshots();
    let scratch = TempDir::new().unwrap();
    let writer = ManifestWriter::new(test_config(scratch.path())).unwrap();

    let manifest = writer.build_manifest(db.prefix_len(), &planned_links(&db)).unwrap();

    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        "db.snapshots/snap-1/000001.sst\t000001.sst\n\
         db.snapshots/snap-2/000000.sst\tdb.snapshots/snap-1/000000.sst\n"
    );
}

#[test]
fn transferred_package_materializes_links() {
    init_tracing();
    let db = live_with_snapshots();
    let scratch = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    let config = test_config(scratch.path());
    let writer = ManifestWriter::new(config.clone()).unwrap();

    let packaged = staging.path().join("outgoing");
    package(&db, &packaged);
    let manifest = writer.build_manifest(db.prefix_len(), &planned_links(&db)).unwrap();
    writer.install(&manifest, &packaged).unwrap();

    // "Transfer": the directory lands somewhere else entirely
    let received = staging.path().join("incoming").join("om.db");
    fs::create_dir_all(received.parent().unwrap()).unwrap();
    fs::rename(&packaged, &received).unwrap();

    let report = ManifestApplier::new(config).unwrap().apply(&received, false).unwrap();

    assert_eq!(report.linked, 2);
    assert!(report.is_clean());
    assert!(same_file(
        &received.join("db.snapshots/snap-1/000001.sst"),
        &received.join("000001.sst")
    )
    .unwrap());
    assert!(same_file(
        &received.join("db.snapshots/snap-2/000000.sst"),
        &received.join("db.snapshots/snap-1/000000.sst")
    )
    .unwrap());
    assert_eq!(
        fs::read(received.join("db.snapshots/snap-2/000000.sst")).unwrap(),
        b"sst-0"
    );
    assert!(!received.join("hardLinkFile").exists());
}

#[test]
fn staged_sources_removed_after_linking() {
    init_tracing();
    let db = LiveDb::new();
    db.write_active("000007.sst", b"sst-7");
    let scratch = TempDir::new().unwrap();
    let config = test_config(scratch.path());
    let writer = ManifestWriter::new(config.clone()).unwrap();

    // Two snapshots receive the same staged file; the staging copy goes away
    let mut links = BTreeMap::new();
    links.insert(
        db.snapshot("snap-1").join("000007.sst"),
        db.checkpoint().join("000007.sst"),
    );
    links.insert(
        db.snapshot("snap-2").join("000007.sst"),
        db.checkpoint().join("000007.sst"),
    );

    let target = TempDir::new().unwrap();
    copy_file(&db.checkpoint().join("000007.sst"), &target.path().join("000007.sst"));
    let manifest = writer.build_manifest(db.prefix_len(), &links).unwrap();
    writer.install(&manifest, target.path()).unwrap();

    let report = ManifestApplier::new(config).unwrap().apply(target.path(), true).unwrap();

    assert_eq!(report.linked, 2);
    assert_eq!(report.sources_deleted, 1);
    assert!(!target.path().join("000007.sst").exists());
    assert!(same_file(
        &target.path().join("db.snapshots/snap-1/000007.sst"),
        &target.path().join("db.snapshots/snap-2/000007.sst")
    )
    .unwrap());
}

#[test]
fn second_install_waits_for_apply() {
    init_tracing();
    let scratch = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let config = test_config(scratch.path());
    let writer = ManifestWriter::new(config.clone()).unwrap();

    let first = writer.build_manifest(0, &BTreeMap::new()).unwrap();
    writer.install(&first, target.path()).unwrap();
    let second = writer.build_manifest(0, &BTreeMap::new()).unwrap();
    assert!(writer.install(&second, target.path()).is_err());

    ManifestApplier::new(config).unwrap().apply(target.path(), false).unwrap();
    writer.install(&second, target.path()).unwrap();
}

#[test]
fn prefix_missing_separator_fails_before_anything_is_written() {
    init_tracing();
    let db = live_with_snapshots();
    let scratch = TempDir::new().unwrap();
    let writer = ManifestWriter::new(test_config(scratch.path())).unwrap();

    // Root length without the trailing separator leaves "/db.snapshots/..."
    let err = writer
        .build_manifest(db.prefix_len() - 1, &planned_links(&db))
        .unwrap_err();

    assert!(matches!(err, LinkError::InvalidEntry { .. }));
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}
