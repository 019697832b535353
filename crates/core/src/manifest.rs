//! Hard-link manifest format
//!
//! A manifest is plain UTF-8 text, one link per line:
//!
//! ```text
//! snap1/000012.sst<TAB>000012.sst
//! snap1/000013.sst<TAB>db.snapshots/snap-0/000013.sst
//! ```
//!
//! The first field is the new directory entry, the second the existing file
//! it must point at. Both are relative to the directory holding the
//! manifest. A destination appears at most once; a source may be shared by
//! any number of destinations.

use std::fmt;

use crate::error::{LinkError, LinkResult};
use crate::path::is_contained_relative;

/// Well-known manifest file name inside a snapshot directory
pub const HARDLINK_MANIFEST_NAME: &str = "hardLinkFile";

/// Directory name of the active (live) database checkpoint
pub const ACTIVE_CHECKPOINT_DIR: &str = "db.checkpoints";

/// File name prefix for freshly written temporary manifests
pub const MANIFEST_TEMP_PREFIX: &str = "data";

/// File name suffix for freshly written temporary manifests
pub const MANIFEST_TEMP_SUFFIX: &str = ".txt";

/// Separator between destination and source
pub const FIELD_SEPARATOR: char = '\t';

/// One destination -> source instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Path of the link to create, relative to the manifest's directory
    pub destination: String,
    /// Path of the existing file, relative to the manifest's directory
    pub source: String,
}

impl LinkEntry {
    /// Create an entry
    ///
    /// Rejects anything the applier would skip as malformed, so a manifest
    /// built from entries always replays in full.
    pub fn new(destination: impl Into<String>, source: impl Into<String>) -> LinkResult<Self> {
        let destination = destination.into();
        let source = source.into();
        for field in [&destination, &source] {
            if field.contains(|c: char| c == FIELD_SEPARATOR || c == '\n' || c == '\r') {
                return Err(LinkError::UnencodablePath(field.clone()));
            }
        }
        if let Err(reason) = check_fields(&destination, &source) {
            return Err(LinkError::InvalidEntry {
                from: source,
                to: destination,
                reason,
            });
        }
        Ok(LinkEntry {
            destination,
            source,
        })
    }

    /// Parse one manifest line (without its terminator)
    pub fn parse_line(line: &str) -> Result<Self, &'static str> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != 2 {
            return Err("expected exactly two tab-separated fields");
        }
        let (destination, source) = (fields[0], fields[1]);
        check_fields(destination, source)?;
        Ok(LinkEntry {
            destination: destination.to_string(),
            source: source.to_string(),
        })
    }
}

/// Rules shared by construction and parsing
fn check_fields(destination: &str, source: &str) -> Result<(), &'static str> {
    if destination.is_empty() || source.is_empty() {
        return Err("empty field");
    }
    if !is_contained_relative(destination) || !is_contained_relative(source) {
        return Err("path escapes the target directory");
    }
    if destination == source {
        return Err("destination equals source");
    }
    Ok(())
}

impl fmt::Display for LinkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.destination, FIELD_SEPARATOR, self.source)
    }
}

/// A manifest line that could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number
    pub line_number: usize,
    /// Raw line text
    pub content: String,
    /// Why the line was rejected
    pub reason: &'static str,
}

/// Result of parsing manifest text
#[derive(Debug, Clone, Default)]
pub struct ParsedManifest {
    /// Well-formed entries in file order
    pub entries: Vec<LinkEntry>,
    /// Lines that were skipped
    pub malformed: Vec<MalformedLine>,
}

/// Ordered list of link entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkManifest {
    entries: Vec<LinkEntry>,
}

impl LinkManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        LinkManifest::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: LinkEntry) {
        self.entries.push(entry);
    }

    /// Entries in write order
    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as manifest text, every line newline-terminated
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.to_string());
            text.push('\n');
        }
        text
    }

    /// Parse manifest text, separating good entries from malformed lines
    ///
    /// Never fails: a bad line only affects itself.
    pub fn parse(text: &str) -> ParsedManifest {
        let mut parsed = ParsedManifest::default();
        for (idx, line) in text.lines().enumerate() {
            match LinkEntry::parse_line(line) {
                Ok(entry) => parsed.entries.push(entry),
                Err(reason) => parsed.malformed.push(MalformedLine {
                    line_number: idx + 1,
                    content: line.to_string(),
                    reason,
                }),
            }
        }
        parsed
    }
}
