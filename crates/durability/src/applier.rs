//! Hard-link manifest replay
//!
//! Materializes the links listed in `<dir>/<manifest_name>`:
//!
//! 1. No manifest: nothing to do.
//! 2. Malformed lines are logged and skipped.
//! 3. Every well-formed line becomes `dir/destination` -> `dir/source`,
//!    creating parent directories as needed. A link failure aborts the pass.
//! 4. After a complete pass the manifest is deleted.
//! 5. Optionally, the sources are deleted (best effort).
//!
//! # Replay
//!
//! An aborted pass leaves the manifest and every source in place. Running
//! the applier again after fixing the cause completes the pass: with
//! [`ExistingLinkPolicy::AcceptSameFile`] destinations that were already
//! linked to their source are counted and skipped.
//!
//! Only one pass may run per directory at a time; callers serialize.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use snaplink_core::{LinkError, LinkManifest, LinkResult};
use tracing::{debug, info, warn};

use crate::config::{ExistingLinkPolicy, LinkConfig};
use crate::fsutil::ensure_parent;
use crate::identity::same_entry;

/// Outcome of one applier pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Whether a manifest was present
    pub manifest_found: bool,
    /// Links created by this pass
    pub linked: usize,
    /// Destinations that already pointed at their source
    pub already_linked: usize,
    /// Malformed lines skipped
    pub skipped_lines: usize,
    /// Source files removed after linking
    pub sources_deleted: usize,
    /// Source files that could not be removed
    pub cleanup_failures: usize,
}

impl ApplyReport {
    /// True when no line was skipped and cleanup had no failures
    pub fn is_clean(&self) -> bool {
        self.skipped_lines == 0 && self.cleanup_failures == 0
    }
}

/// Replays link manifests
#[derive(Debug, Clone)]
pub struct ManifestApplier {
    config: LinkConfig,
}

impl ManifestApplier {
    /// Create an applier; the configuration is validated up front
    pub fn new(config: LinkConfig) -> LinkResult<Self> {
        config.validate()?;
        Ok(ManifestApplier { config })
    }

    /// Apply the manifest in `target_dir`, if any
    ///
    /// # Errors
    ///
    /// - `CreateDirectory`: a destination parent could not be created
    /// - `Link`: a link could not be created (the manifest is kept)
    /// - `DeleteManifest`: the manifest could not be removed after the pass
    /// - `Io`: the manifest could not be read
    pub fn apply(&self, target_dir: &Path, delete_sources: bool) -> LinkResult<ApplyReport> {
        let manifest_path = self.config.manifest_path(target_dir);
        let mut report = ApplyReport::default();

        let text = match fs::read_to_string(&manifest_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(
                    target: "snaplink::apply",
                    dir = %target_dir.display(),
                    "No link manifest, nothing to apply"
                );
                return Ok(report);
            }
            Err(e) => return Err(e.into()),
        };
        report.manifest_found = true;

        let parsed = LinkManifest::parse(&text);
        for line in &parsed.malformed {
            warn!(
                target: "snaplink::apply",
                manifest = %manifest_path.display(),
                line = line.line_number,
                content = %line.content,
                reason = line.reason,
                "Skipping malformed line in hardlink manifest"
            );
        }
        report.skipped_lines = parsed.malformed.len();

        let mut sources: Vec<PathBuf> = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut destinations: HashSet<PathBuf> = HashSet::new();

        for entry in &parsed.entries {
            let from = target_dir.join(&entry.source);
            let to = target_dir.join(&entry.destination);

            if seen.insert(from.clone()) {
                sources.push(from.clone());
            }
            destinations.insert(to.clone());

            ensure_parent(&to)?;
            match fs::hard_link(&from, &to) {
                Ok(()) => report.linked += 1,
                Err(e)
                    if e.kind() == io::ErrorKind::AlreadyExists && self.is_same_link(&from, &to) =>
                {
                    debug!(
                        target: "snaplink::apply",
                        to = %to.display(),
                        "Link already present"
                    );
                    report.already_linked += 1;
                }
                Err(source) => return Err(LinkError::Link { from, to, source }),
            }
        }

        fs::remove_file(&manifest_path).map_err(|source| LinkError::DeleteManifest {
            path: manifest_path.clone(),
            source,
        })?;

        if delete_sources {
            remove_sources(&sources, &destinations, &mut report);
        }

        info!(
            target: "snaplink::apply",
            dir = %target_dir.display(),
            linked = report.linked,
            already_linked = report.already_linked,
            skipped = report.skipped_lines,
            sources_deleted = report.sources_deleted,
            "Applied link manifest"
        );
        Ok(report)
    }

    fn is_same_link(&self, from: &Path, to: &Path) -> bool {
        match self.config.existing_links {
            ExistingLinkPolicy::AcceptSameFile => same_entry(from, to).unwrap_or(false),
            ExistingLinkPolicy::Fail => false,
        }
    }
}

/// Best-effort removal of linked sources
///
/// A source that is also a destination of this manifest is kept: it is a
/// deliverable of the pass, not a staging file.
fn remove_sources(sources: &[PathBuf], destinations: &HashSet<PathBuf>, report: &mut ApplyReport) {
    for source in sources {
        if destinations.contains(source) {
            continue;
        }
        match fs::remove_file(source) {
            Ok(()) => report.sources_deleted += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    target: "snaplink::apply",
                    path = %source.display(),
                    error = %e,
                    "Couldn't delete source file after linking"
                );
                report.cleanup_failures += 1;
            }
        }
    }
}

/// Apply the manifest in `target_dir` with the default configuration
///
/// See [`ManifestApplier::apply`].
pub fn apply_manifest(target_dir: &Path, delete_sources: bool) -> LinkResult<ApplyReport> {
    ManifestApplier::new(LinkConfig::default())?.apply(target_dir, delete_sources)
}
