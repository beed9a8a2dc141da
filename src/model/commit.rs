//! The commit record and its canonical byte codec.
//!
//! A commit is stored as four LF-terminated text lines:
//!
//! ```text
//! parent [<id1> [<id2>]]
//! timestamp <seconds>
//! message <text>
//! files [<name1>:<id1>;<name2>:<id2>;…]
//! ```
//!
//! The space after `parent` and after `files` is always present, file pairs
//! are sorted by name and each pair ends with `;`. The byte layout is frozen:
//! a commit's id is the SHA-1 of exactly these bytes, so encoding must be
//! reproducible and parsing must accept nothing else.
//!
//! Records are distinguished from blobs by their first bytes: anything
//! beginning with `parent ` is treated as a commit record. A user blob that
//! happens to start with that prefix is indistinguishable at this layer;
//! callers that enumerate the store also require the full record to parse.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use super::types::ObjectId;

/// The leading bytes that mark a stored object as a commit record.
pub const RECORD_PREFIX: &[u8] = b"parent ";

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// An immutable commit: parents, creation time, message, and the snapshot's
/// filename-to-blob mapping.
///
/// `files` is a `BTreeMap` so serialization order is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// 0 (root), 1, or 2 (merge) parent commit ids. For a merge, the first
    /// parent is the branch the merge was performed on.
    pub parents: Vec<ObjectId>,
    /// Seconds since the epoch. The root commit uses 0.
    pub timestamp: i64,
    /// Single-line commit message.
    pub message: String,
    /// Filename to blob id.
    pub files: BTreeMap<String, ObjectId>,
}

impl Commit {
    /// Whether this commit has two parents.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() == 2
    }

    /// The first parent, if any. `log` follows only this edge.
    #[must_use]
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Serialize to the canonical byte form whose SHA-1 is the commit id.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str("parent ");
        for (i, parent) in self.parents.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(parent.as_str());
        }
        out.push('\n');
        let _ = writeln!(out, "timestamp {}", self.timestamp);
        let _ = writeln!(out, "message {}", self.message);
        out.push_str("files ");
        for (name, blob) in &self.files {
            let _ = write!(out, "{name}:{blob};");
        }
        out.push('\n');
        out.into_bytes()
    }

    /// Parse a stored record back into a [`Commit`].
    ///
    /// # Errors
    /// Returns [`RecordError`] when the bytes are not a well-formed record.
    pub fn parse(bytes: &[u8]) -> Result<Self, RecordError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| RecordError::new("commit record is not valid UTF-8"))?;
        let mut lines = text.lines();

        let parent_line = lines
            .next()
            .and_then(|l| l.strip_prefix("parent "))
            .ok_or_else(|| RecordError::new("missing 'parent' line"))?;
        let parents = parent_line
            .split_whitespace()
            .map(|id| {
                ObjectId::new(id).map_err(|e| RecordError::new(format!("bad parent id: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let timestamp_line = lines
            .next()
            .and_then(|l| l.strip_prefix("timestamp "))
            .ok_or_else(|| RecordError::new("missing 'timestamp' line"))?;
        let timestamp = timestamp_line
            .parse::<i64>()
            .map_err(|_| RecordError::new(format!("bad timestamp {timestamp_line:?}")))?;

        let message = lines
            .next()
            .and_then(|l| l.strip_prefix("message "))
            .ok_or_else(|| RecordError::new("missing 'message' line"))?
            .to_owned();

        let files_line = lines
            .next()
            .and_then(|l| l.strip_prefix("files "))
            .ok_or_else(|| RecordError::new("missing 'files' line"))?;
        let mut files = BTreeMap::new();
        for pair in files_line.split(';').filter(|p| !p.is_empty()) {
            let (name, blob) = pair
                .split_once(':')
                .ok_or_else(|| RecordError::new(format!("bad file entry {pair:?}")))?;
            let blob = ObjectId::new(blob)
                .map_err(|e| RecordError::new(format!("bad blob id for {name:?}: {e}")))?;
            files.insert(name.to_owned(), blob);
        }

        Ok(Self {
            parents,
            timestamp,
            message,
            files,
        })
    }

    /// Heuristic: stored bytes are a commit record iff they begin with the
    /// literal `parent ` prefix.
    #[must_use]
    pub fn is_record(bytes: &[u8]) -> bool {
        bytes.starts_with(RECORD_PREFIX)
    }
}

// ---------------------------------------------------------------------------
// RecordError
// ---------------------------------------------------------------------------

/// A stored commit record could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordError {
    /// What was malformed.
    pub detail: String,
}

impl RecordError {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed commit record: {}", self.detail)
    }
}

impl std::error::Error for RecordError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
