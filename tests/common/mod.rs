//! Shared test infrastructure.
#![allow(dead_code)]
//!
//! Provides [`TestRepo`], a self-contained repository in a temporary
//! directory. Each instance gets its own temp dir, drives the real engine
//! through the library API, and cleans up on drop.
//!
//! Helpers operate on filenames relative to the repository root, so tests
//! read as scenarios rather than path bookkeeping.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use gitlite::model::ObjectId;
use gitlite::repo::{META_DIR, Repository};

/// A self-contained repository in a temporary directory.
///
/// The temp dir is deleted when the value drops.
pub struct TestRepo {
    /// Held to keep the temp dir alive.
    _dir: TempDir,
    repo: Repository,
}

impl TestRepo {
    /// Create and initialize a fresh repository.
    ///
    /// # Panics
    /// Panics when the temp dir or the repository cannot be created.
    #[must_use]
    pub fn init() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("failed to initialize repository");
        Self { _dir: dir, repo }
    }

    /// The engine handle.
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// The working-tree root.
    pub fn root(&self) -> &Path {
        self.repo.root()
    }

    /// The metadata directory, as registered for remotes.
    pub fn meta_dir(&self) -> PathBuf {
        self.root().join(META_DIR)
    }

    /// The metadata directory as a `&str` for `add-remote`.
    pub fn meta_dir_string(&self) -> String {
        self.meta_dir().to_string_lossy().into_owned()
    }

    /// Write (or overwrite) a working-tree file.
    pub fn write_file(&self, name: &str, content: &str) {
        fs::write(self.root().join(name), content).expect("failed to write working file");
    }

    /// Delete a working-tree file.
    pub fn delete_file(&self, name: &str) {
        fs::remove_file(self.root().join(name)).expect("failed to delete working file");
    }

    /// Read a working-tree file as UTF-8.
    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.root().join(name)).expect("failed to read working file")
    }

    /// Whether a working-tree file exists.
    pub fn file_exists(&self, name: &str) -> bool {
        self.root().join(name).is_file()
    }

    /// Write a file and stage it.
    pub fn stage(&self, name: &str, content: &str) {
        self.write_file(name, content);
        self.repo.add(name).expect("failed to stage file");
    }

    /// Write, stage, and commit one file; returns the new commit id.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> ObjectId {
        self.stage(name, content);
        self.repo.commit(message).expect("failed to commit")
    }

    /// The current tip commit id.
    pub fn head(&self) -> ObjectId {
        self.repo.head_commit_id().expect("failed to read head")
    }

    /// Top-level working files, metadata directory excluded.
    pub fn working_files(&self) -> Vec<String> {
        gitlite::worktree::working_files(self.root()).expect("failed to list working files")
    }
}
