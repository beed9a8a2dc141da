//! The staging area: per-file intents recorded against the current commit.
//!
//! One file per staged name under `staging/`; the file holds either the blob
//! id to carry into the next commit or the literal `DELETE`. A missing or
//! empty directory means nothing is staged. The whole directory is dropped
//! on every successful commit and on branch/reset transitions.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::GitliteError;
use crate::fsutil;
use crate::model::ObjectId;

/// Entry content marking a staged deletion.
pub const DELETE_SENTINEL: &str = "DELETE";

// ---------------------------------------------------------------------------
// StageEntry
// ---------------------------------------------------------------------------

/// One staged intent for a filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageEntry {
    /// Replace or add the file with this blob in the next commit.
    Add(ObjectId),
    /// Remove the file in the next commit.
    Remove,
}

impl StageEntry {
    /// Whether this entry stages an addition.
    #[must_use]
    pub const fn is_addition(&self) -> bool {
        matches!(self, Self::Add(_))
    }
}

// ---------------------------------------------------------------------------
// StagingArea
// ---------------------------------------------------------------------------

/// Read/write access to the staging directory.
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Open the staging area rooted at `dir`.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read one entry. `None` when the name is not staged.
    ///
    /// # Errors
    /// Fails with corruption when the entry holds neither a blob id nor the
    /// deletion sentinel.
    pub fn get(&self, name: &str) -> Result<Option<StageEntry>, GitliteError> {
        match fs::read_to_string(self.entry_path(name)) {
            Ok(content) => Self::parse_entry(name, &content).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All staged entries, keyed by filename.
    ///
    /// # Errors
    /// Fails with corruption when any entry is malformed.
    pub fn entries(&self) -> Result<BTreeMap<String, StageEntry>, GitliteError> {
        let mut entries = BTreeMap::new();
        for name in fsutil::plain_filenames_in(&self.dir)? {
            let content = fs::read_to_string(self.entry_path(&name))?;
            entries.insert(name.clone(), Self::parse_entry(&name, &content)?);
        }
        Ok(entries)
    }

    fn parse_entry(name: &str, content: &str) -> Result<StageEntry, GitliteError> {
        let content = content.trim_end();
        if content == DELETE_SENTINEL {
            return Ok(StageEntry::Remove);
        }
        let id = ObjectId::new(content)
            .map_err(|e| GitliteError::corrupt(format!("staging entry {name:?}: {e}")))?;
        Ok(StageEntry::Add(id))
    }

    /// Stage `name` for addition with blob `id`, replacing any prior entry.
    ///
    /// # Errors
    /// Returns an I/O error if the entry cannot be written.
    pub fn stage_addition(&self, name: &str, id: &ObjectId) -> Result<(), GitliteError> {
        fs::create_dir_all(&self.dir)?;
        fsutil::write_atomic(&self.entry_path(name), id.as_str().as_bytes())?;
        Ok(())
    }

    /// Stage `name` for removal, replacing any prior entry.
    ///
    /// # Errors
    /// Returns an I/O error if the entry cannot be written.
    pub fn stage_removal(&self, name: &str) -> Result<(), GitliteError> {
        fs::create_dir_all(&self.dir)?;
        fsutil::write_atomic(&self.entry_path(name), DELETE_SENTINEL.as_bytes())?;
        Ok(())
    }

    /// Drop the entry for `name`, whether addition or removal. Missing is
    /// not an error.
    ///
    /// # Errors
    /// Returns an I/O error if the delete fails.
    pub fn unstage(&self, name: &str) -> Result<(), GitliteError> {
        fsutil::remove_file_if_exists(&self.entry_path(name))?;
        Ok(())
    }

    /// Whether nothing is staged.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be enumerated.
    pub fn is_empty(&self) -> Result<bool, GitliteError> {
        Ok(fsutil::plain_filenames_in(&self.dir)?.is_empty())
    }

    /// Drop the entire staging directory.
    ///
    /// # Errors
    /// Returns an I/O error if the removal fails.
    pub fn clear(&self) -> Result<(), GitliteError> {
        fsutil::rmtree(&self.dir)?;
        Ok(())
    }
}

/// Apply staged entries to a commit's file map: additions set the blob,
/// removals drop the name. Used when building the next commit's snapshot.
pub fn apply(files: &mut BTreeMap<String, ObjectId>, entries: &BTreeMap<String, StageEntry>) {
    for (name, entry) in entries {
        match entry {
            StageEntry::Add(id) => {
                files.insert(name.clone(), id.clone());
            }
            StageEntry::Remove => {
                files.remove(name);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
