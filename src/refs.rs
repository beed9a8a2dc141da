//! HEAD, branch refs, remote-tracking refs, and the remotes table.
//!
//! # Ref hierarchy
//!
//! ```text
//! <meta>/
//! ├── HEAD                      ← "ref: refs/heads/<branch>"
//! ├── refs/heads/<branch>       ← local branch tip (40-hex commit id)
//! ├── refs/heads/<remote>/<b>   ← remote-tracking tip, written by fetch
//! └── remotes/<name>            ← path to another repository's meta dir
//! ```
//!
//! Ref writes are rename-based, so a crash leaves a ref at either its old or
//! its new value. Branch names may contain `/` (remote-tracking refs); the
//! flat branch listing only reports plain local branches.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::GitliteError;
use crate::fsutil;
use crate::model::ObjectId;

/// The symbolic-ref prefix stored in `HEAD`.
pub const HEAD_REF_PREFIX: &str = "ref: refs/heads/";

/// Subdirectory holding branch tips.
pub const HEADS_DIR: &str = "refs/heads";

/// Subdirectory holding the remote name-to-path table.
pub const REMOTES_DIR: &str = "remotes";

// ---------------------------------------------------------------------------
// RefStore
// ---------------------------------------------------------------------------

/// Read/write access to one repository's refs, rooted at its metadata
/// directory.
pub struct RefStore {
    dir: PathBuf,
}

impl RefStore {
    /// Open the ref store rooted at the metadata directory `dir`.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn head_path(&self) -> PathBuf {
        self.dir.join("HEAD")
    }

    fn heads_dir(&self) -> PathBuf {
        self.dir.join(HEADS_DIR)
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_dir().join(name)
    }

    fn remote_entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(REMOTES_DIR).join(name)
    }

    // -----------------------------------------------------------------------
    // HEAD
    // -----------------------------------------------------------------------

    /// The branch `HEAD` names.
    ///
    /// # Errors
    /// Fails with corruption when `HEAD` is missing or not a symbolic ref.
    pub fn head_branch(&self) -> Result<String, GitliteError> {
        let content = match fs::read_to_string(self.head_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GitliteError::corrupt("HEAD is missing"));
            }
            Err(e) => return Err(e.into()),
        };
        content
            .trim_end()
            .strip_prefix(HEAD_REF_PREFIX)
            .map(str::to_owned)
            .ok_or_else(|| GitliteError::corrupt(format!("HEAD is not a symbolic ref: {content:?}")))
    }

    /// Point `HEAD` at a branch.
    ///
    /// # Errors
    /// Returns an I/O error if the write fails.
    pub fn set_head(&self, branch: &str) -> Result<(), GitliteError> {
        fsutil::write_atomic(&self.head_path(), format!("{HEAD_REF_PREFIX}{branch}").as_bytes())?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Branch refs
    // -----------------------------------------------------------------------

    /// Read a branch tip. `None` when the branch does not exist.
    ///
    /// # Errors
    /// Fails with corruption when the ref file holds an invalid id.
    pub fn read_branch(&self, name: &str) -> Result<Option<ObjectId>, GitliteError> {
        let content = match fs::read_to_string(self.branch_path(name)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let id = ObjectId::new(content.trim_end())
            .map_err(|e| GitliteError::corrupt(format!("branch {name:?}: {e}")))?;
        Ok(Some(id))
    }

    /// Point a branch (creating it if needed) at a commit.
    ///
    /// # Errors
    /// Returns an I/O error if the write fails.
    pub fn write_branch(&self, name: &str, id: &ObjectId) -> Result<(), GitliteError> {
        let path = self.branch_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fsutil::write_atomic(&path, id.as_str().as_bytes())?;
        Ok(())
    }

    /// Delete a branch ref. Missing is not an error.
    ///
    /// # Errors
    /// Returns an I/O error if the delete fails.
    pub fn delete_branch(&self, name: &str) -> Result<(), GitliteError> {
        fsutil::remove_file_if_exists(&self.branch_path(name))?;
        Ok(())
    }

    /// Whether a branch ref exists.
    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.branch_path(name).is_file()
    }

    /// Local branch names, sorted ascending. Remote-tracking refs live in
    /// subdirectories and are not included.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be enumerated.
    pub fn list_branches(&self) -> Result<Vec<String>, GitliteError> {
        Ok(fsutil::plain_filenames_in(&self.heads_dir())?)
    }

    // -----------------------------------------------------------------------
    // Remotes table
    // -----------------------------------------------------------------------

    /// The stored path for a remote, verbatim. `None` when not configured.
    ///
    /// # Errors
    /// Returns an I/O error if the entry cannot be read.
    pub fn remote_path(&self, name: &str) -> Result<Option<String>, GitliteError> {
        match fs::read_to_string(self.remote_entry_path(name)) {
            Ok(content) => Ok(Some(content.trim_end().to_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store a remote's path verbatim.
    ///
    /// # Errors
    /// Returns an I/O error if the write fails.
    pub fn write_remote(&self, name: &str, path: &str) -> Result<(), GitliteError> {
        let entry = self.remote_entry_path(name);
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent)?;
        }
        fsutil::write_atomic(&entry, path.as_bytes())?;
        Ok(())
    }

    /// Remove a remote's table entry.
    ///
    /// # Errors
    /// Returns an I/O error if the delete fails.
    pub fn remove_remote(&self, name: &str) -> Result<(), GitliteError> {
        fsutil::remove_file_if_exists(&self.remote_entry_path(name))?;
        Ok(())
    }

    /// Whether a remote is configured.
    #[must_use]
    pub fn remote_exists(&self, name: &str) -> bool {
        self.remote_entry_path(name).is_file()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
