//! Repository layout and the command engine.
//!
//! [`Repository`] owns the on-disk layout and implements every command that
//! is not merge or remote transfer (those compose this module from
//! [`crate::merge`] and [`crate::remote`]). Operations return data; the CLI
//! decides how to print it.
//!
//! # On-disk layout
//!
//! ```text
//! <root>/
//! ├── <working files…>
//! └── .gitlite/
//!     ├── HEAD
//!     ├── objects/<40-hex>
//!     ├── refs/heads/<branch>
//!     ├── remotes/<name>
//!     └── staging/<filename>
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use tracing::{debug, info};

use crate::error::GitliteError;
use crate::fsutil;
use crate::model::{Commit, ObjectId};
use crate::objects::ObjectStore;
use crate::refs::{HEADS_DIR, RefStore};
use crate::staging::{self, StageEntry, StagingArea};
use crate::worktree;

/// Name of the metadata directory at the working-tree root.
pub const META_DIR: &str = ".gitlite";

/// Branch created by `init`.
pub const DEFAULT_BRANCH: &str = "master";

const OBJECTS_DIR: &str = "objects";
const STAGING_DIR: &str = "staging";
const ROOT_MESSAGE: &str = "initial commit";

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// One repository: a working directory plus its metadata directory.
pub struct Repository {
    root: PathBuf,
    meta: PathBuf,
}

impl Repository {
    /// Initialize a new repository at `root`: empty root commit (timestamp
    /// 0), branch `master` pointing at it, `HEAD` on `master`.
    ///
    /// # Errors
    /// [`GitliteError::RepoExists`] when `root` is already initialized.
    pub fn init(root: &Path) -> Result<Self, GitliteError> {
        let meta = root.join(META_DIR);
        if meta.is_dir() {
            return Err(GitliteError::RepoExists);
        }
        fs::create_dir_all(meta.join(OBJECTS_DIR))?;
        fs::create_dir_all(meta.join(HEADS_DIR))?;
        fs::create_dir_all(meta.join("refs/remotes"))?;

        let repo = Self {
            root: root.to_path_buf(),
            meta,
        };
        let root_commit = Commit {
            parents: vec![],
            timestamp: 0,
            message: ROOT_MESSAGE.to_owned(),
            files: BTreeMap::new(),
        };
        let id = repo.objects().put_commit(&root_commit)?;
        repo.refs().write_branch(DEFAULT_BRANCH, &id)?;
        repo.refs().set_head(DEFAULT_BRANCH)?;
        info!(root = %root.display(), commit = %id, "initialized repository");
        Ok(repo)
    }

    /// Open an existing repository at `root`.
    ///
    /// # Errors
    /// [`GitliteError::RepoMissing`] when `root` is not initialized.
    pub fn open(root: &Path) -> Result<Self, GitliteError> {
        let meta = root.join(META_DIR);
        if !meta.is_dir() {
            return Err(GitliteError::RepoMissing);
        }
        Ok(Self {
            root: root.to_path_buf(),
            meta,
        })
    }

    /// The working-tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The object store.
    #[must_use]
    pub fn objects(&self) -> ObjectStore {
        ObjectStore::new(self.meta.join(OBJECTS_DIR))
    }

    /// The ref store.
    #[must_use]
    pub fn refs(&self) -> RefStore {
        RefStore::new(self.meta.clone())
    }

    /// The staging area.
    #[must_use]
    pub fn staging(&self) -> StagingArea {
        StagingArea::new(self.meta.join(STAGING_DIR))
    }

    /// The branch `HEAD` is on.
    ///
    /// # Errors
    /// Fails with corruption when `HEAD` is unreadable.
    pub fn head_branch(&self) -> Result<String, GitliteError> {
        self.refs().head_branch()
    }

    /// The current branch's tip commit id.
    ///
    /// # Errors
    /// Fails with corruption when the current branch ref is missing.
    pub fn head_commit_id(&self) -> Result<ObjectId, GitliteError> {
        let branch = self.head_branch()?;
        self.refs().read_branch(&branch)?.ok_or_else(|| {
            GitliteError::corrupt(format!("HEAD names a missing branch {branch:?}"))
        })
    }

    /// The current branch's tip commit.
    ///
    /// # Errors
    /// Fails with corruption when the tip cannot be resolved.
    pub fn head_commit(&self) -> Result<Commit, GitliteError> {
        self.objects().read_commit(&self.head_commit_id()?)
    }

    // -----------------------------------------------------------------------
    // add / commit / rm
    // -----------------------------------------------------------------------

    /// Stage a working-tree file for the next commit. Staging a file whose
    /// content matches the current commit clears any existing entry instead
    /// (including a staged deletion).
    ///
    /// # Errors
    /// [`GitliteError::FileMissing`] when the working file does not exist;
    /// [`GitliteError::UnsupportedFileName`] when the name cannot be stored
    /// in a commit record.
    pub fn add(&self, name: &str) -> Result<(), GitliteError> {
        if name.contains([':', ';', '\n']) {
            return Err(GitliteError::UnsupportedFileName {
                name: name.to_owned(),
            });
        }
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(GitliteError::FileMissing);
        }
        let blob = self.objects().put(&fs::read(&path)?)?;
        let head_blob = self.head_commit()?.files.get(name).cloned();
        let staging = self.staging();
        if head_blob.as_ref() == Some(&blob) {
            staging.unstage(name)?;
        } else {
            staging.stage_addition(name, &blob)?;
        }
        debug!(name, blob = %blob, "staged file");
        Ok(())
    }

    /// Create a commit from the staged changes.
    ///
    /// # Errors
    /// [`GitliteError::EmptyMessage`] for an empty message;
    /// [`GitliteError::NothingStaged`] when nothing is staged.
    pub fn commit(&self, message: &str) -> Result<ObjectId, GitliteError> {
        if message.is_empty() {
            return Err(GitliteError::EmptyMessage);
        }
        let entries = self.staging().entries()?;
        if entries.is_empty() {
            return Err(GitliteError::NothingStaged);
        }
        let head = self.head_commit_id()?;
        self.commit_staged(message, vec![head], &entries)
    }

    /// Build the next snapshot from `parents[0]`'s files plus the staged
    /// entries, write the commit, advance the current branch, clear staging.
    /// Merge commits pass two parents.
    pub(crate) fn commit_staged(
        &self,
        message: &str,
        parents: Vec<ObjectId>,
        entries: &BTreeMap<String, StageEntry>,
    ) -> Result<ObjectId, GitliteError> {
        let first_parent = parents.first().ok_or_else(|| {
            GitliteError::corrupt("cannot build a snapshot without a parent commit")
        })?;
        let mut files = self.objects().read_commit(first_parent)?.files;
        staging::apply(&mut files, entries);
        let commit = Commit {
            parents,
            timestamp: fsutil::epoch_seconds(),
            message: message.to_owned(),
            files,
        };
        let id = self.objects().put_commit(&commit)?;
        let branch = self.head_branch()?;
        self.refs().write_branch(&branch, &id)?;
        self.staging().clear()?;
        info!(id = %id, branch, "created commit");
        Ok(id)
    }

    /// Unstage a staged-only file, or stage a tracked file for deletion and
    /// remove its working copy.
    ///
    /// # Errors
    /// [`GitliteError::NoReasonToRemove`] when the file is neither staged
    /// nor tracked.
    pub fn rm(&self, name: &str) -> Result<(), GitliteError> {
        let staging = self.staging();
        let staged = staging.get(name)?.is_some();
        let tracked = self.head_commit()?.files.contains_key(name);
        if !staged && !tracked {
            return Err(GitliteError::NoReasonToRemove);
        }
        if !tracked {
            staging.unstage(name)?;
            return Ok(());
        }
        staging.stage_removal(name)?;
        fsutil::remove_file_if_exists(&self.root.join(name))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // branch / checkout / reset
    // -----------------------------------------------------------------------

    /// Create a branch at the current tip.
    ///
    /// # Errors
    /// [`GitliteError::BranchExists`] when the name is taken.
    pub fn branch(&self, name: &str) -> Result<(), GitliteError> {
        if self.refs().branch_exists(name) {
            return Err(GitliteError::BranchExists);
        }
        let head = self.head_commit_id()?;
        self.refs().write_branch(name, &head)
    }

    /// Delete a branch ref. The commits it pointed at are untouched.
    ///
    /// # Errors
    /// [`GitliteError::BranchMissing`] when the branch does not exist;
    /// [`GitliteError::RemoveCurrentBranch`] for the current branch.
    pub fn rm_branch(&self, name: &str) -> Result<(), GitliteError> {
        if !self.refs().branch_exists(name) {
            return Err(GitliteError::BranchMissing);
        }
        if self.head_branch()? == name {
            return Err(GitliteError::RemoveCurrentBranch);
        }
        self.refs().delete_branch(name)
    }

    /// Switch to another branch, materializing its tip snapshot.
    ///
    /// # Errors
    /// [`GitliteError::NoSuchBranch`], [`GitliteError::CheckoutCurrent`], or
    /// [`GitliteError::UntrackedInTheWay`].
    pub fn checkout_branch(&self, name: &str) -> Result<(), GitliteError> {
        let refs = self.refs();
        let Some(target_tip) = refs.read_branch(name)? else {
            return Err(GitliteError::NoSuchBranch);
        };
        if self.head_branch()? == name {
            return Err(GitliteError::CheckoutCurrent);
        }
        let target = self.objects().read_commit(&target_tip)?;
        let base = self.head_commit()?;
        let staging = self.staging();
        worktree::check_untracked_overwrites(&self.root, &staging, &target.files, &base.files)?;
        worktree::materialize(&self.root, &self.objects(), &target.files, &base.files)?;
        refs.set_head(name)?;
        staging.clear()?;
        info!(branch = name, "checked out branch");
        Ok(())
    }

    /// Restore one file from the current commit.
    ///
    /// # Errors
    /// [`GitliteError::FileNotInCommit`] when the commit does not track it.
    pub fn checkout_file_from_head(&self, name: &str) -> Result<(), GitliteError> {
        let head = self.head_commit_id()?;
        self.checkout_file_at(&head, name)
    }

    /// Restore one file from an (optionally abbreviated) commit id.
    ///
    /// # Errors
    /// [`GitliteError::NoSuchCommit`] or [`GitliteError::FileNotInCommit`].
    pub fn checkout_file(&self, commit_prefix: &str, name: &str) -> Result<(), GitliteError> {
        let id = self.resolve_commit_prefix(commit_prefix)?;
        self.checkout_file_at(&id, name)
    }

    fn checkout_file_at(&self, id: &ObjectId, name: &str) -> Result<(), GitliteError> {
        let commit = self.objects().read_commit(id)?;
        let Some(blob) = commit.files.get(name) else {
            return Err(GitliteError::FileNotInCommit);
        };
        fs::write(self.root.join(name), self.objects().get(blob)?)?;
        Ok(())
    }

    /// Move the current branch to an (optionally abbreviated) commit and
    /// materialize its snapshot. `HEAD` stays on the same branch name.
    ///
    /// # Errors
    /// [`GitliteError::NoSuchCommit`] or [`GitliteError::UntrackedInTheWay`].
    pub fn reset(&self, commit_prefix: &str) -> Result<(), GitliteError> {
        let id = self.resolve_commit_prefix(commit_prefix)?;
        self.reset_to(&id)
    }

    pub(crate) fn reset_to(&self, id: &ObjectId) -> Result<(), GitliteError> {
        let target = self.objects().read_commit(id)?;
        let base = self.head_commit()?;
        let staging = self.staging();
        worktree::check_untracked_overwrites(&self.root, &staging, &target.files, &base.files)?;
        worktree::materialize(&self.root, &self.objects(), &target.files, &base.files)?;
        self.refs().write_branch(&self.head_branch()?, id)?;
        staging.clear()?;
        info!(id = %id, "reset current branch");
        Ok(())
    }

    /// Resolve a possibly-abbreviated commit id against the object store.
    /// Abbreviations scan ids in ascending order; the first match wins.
    ///
    /// # Errors
    /// [`GitliteError::NoSuchCommit`] when nothing matches.
    pub fn resolve_commit_prefix(&self, prefix: &str) -> Result<ObjectId, GitliteError> {
        if prefix.is_empty() {
            return Err(GitliteError::NoSuchCommit);
        }
        if let Ok(id) = ObjectId::new(prefix) {
            if self.objects().has(&id) {
                return Ok(id);
            }
            return Err(GitliteError::NoSuchCommit);
        }
        self.objects()
            .list_ids()?
            .into_iter()
            .find(|id| id.as_str().starts_with(prefix))
            .ok_or(GitliteError::NoSuchCommit)
    }

    // -----------------------------------------------------------------------
    // log / global-log / find
    // -----------------------------------------------------------------------

    /// History from the current tip following first parents only, tip
    /// first. A missing parent object ends the walk.
    ///
    /// # Errors
    /// Fails with corruption when a present record does not parse.
    pub fn log_entries(&self) -> Result<Vec<LogEntry>, GitliteError> {
        let store = self.objects();
        let mut entries = Vec::new();
        let mut cursor = Some(self.head_commit_id()?);
        while let Some(id) = cursor {
            if !store.has(&id) {
                break;
            }
            let commit = store.read_commit(&id)?;
            cursor = commit.first_parent().cloned();
            entries.push(LogEntry { id, commit });
        }
        Ok(entries)
    }

    /// Every commit in the object store, in ascending id order. Objects
    /// that carry the record prefix but do not parse are treated as blobs
    /// and skipped.
    ///
    /// # Errors
    /// Returns an I/O error if the store cannot be enumerated.
    pub fn global_log_entries(&self) -> Result<Vec<LogEntry>, GitliteError> {
        let store = self.objects();
        let mut entries = Vec::new();
        for id in store.list_ids()? {
            let bytes = store.get(&id)?;
            if !Commit::is_record(&bytes) {
                continue;
            }
            if let Ok(commit) = Commit::parse(&bytes) {
                entries.push(LogEntry { id, commit });
            }
        }
        Ok(entries)
    }

    /// Ids of every commit whose message equals `message` exactly.
    ///
    /// # Errors
    /// [`GitliteError::NoCommitWithMessage`] when none match.
    pub fn find(&self, message: &str) -> Result<Vec<ObjectId>, GitliteError> {
        let matches: Vec<ObjectId> = self
            .global_log_entries()?
            .into_iter()
            .filter(|entry| entry.commit.message == message)
            .map(|entry| entry.id)
            .collect();
        if matches.is_empty() {
            return Err(GitliteError::NoCommitWithMessage);
        }
        Ok(matches)
    }
}

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

/// One commit as shown by `log` and `global-log`.
pub struct LogEntry {
    /// The commit's id.
    pub id: ObjectId,
    /// The parsed record.
    pub commit: Commit,
}

impl LogEntry {
    /// Render the entry block, ending with the separating blank line.
    ///
    /// ```text
    /// ===
    /// commit <id>
    /// Merge: <short1> <short2>      (merge commits only)
    /// Date: <local time>
    /// <message>
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("===\n");
        let _ = writeln!(out, "commit {}", self.id);
        if let [first, second] = self.commit.parents.as_slice() {
            let _ = writeln!(out, "Merge: {} {}", first.short(), second.short());
        }
        let _ = writeln!(out, "Date: {}", format_timestamp(self.commit.timestamp));
        let _ = writeln!(out, "{}", self.commit.message);
        out.push('\n');
        out
    }
}

/// Local-timezone rendering of stored epoch seconds.
fn format_timestamp(seconds: i64) -> String {
    Local
        .timestamp_opt(seconds, 0)
        .single()
        .map_or_else(|| seconds.to_string(), |dt| {
            dt.format("%a %b %d %H:%M:%S %Y %z").to_string()
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn write_and_add(repo: &Repository, name: &str, content: &str) {
        fs::write(repo.root().join(name), content).unwrap();
        repo.add(name).unwrap();
    }

    #[test]
    fn init_creates_root_commit_on_master() {
        let (_dir, repo) = init_repo();
        assert_eq!(repo.head_branch().unwrap(), DEFAULT_BRANCH);
        let root = repo.head_commit().unwrap();
        assert!(root.parents.is_empty());
        assert_eq!(root.timestamp, 0);
        assert_eq!(root.message, ROOT_MESSAGE);
        assert!(root.files.is_empty());
    }

    #[test]
    fn init_twice_is_rejected() {
        let (dir, _repo) = init_repo();
        assert!(matches!(
            Repository::init(dir.path()),
            Err(GitliteError::RepoExists)
        ));
    }

    #[test]
    fn init_is_deterministic_across_repositories() {
        let (_d1, a) = init_repo();
        let (_d2, b) = init_repo();
        assert_eq!(
            a.head_commit_id().unwrap(),
            b.head_commit_id().unwrap()
        );
    }

    #[test]
    fn open_requires_an_initialized_directory() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Repository::open(dir.path()),
            Err(GitliteError::RepoMissing)
        ));
    }

    #[test]
    fn add_then_commit_tracks_the_file() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "alpha");
        let id = repo.commit("add a").unwrap();
        let commit = repo.head_commit().unwrap();
        assert_eq!(repo.head_commit_id().unwrap(), id);
        assert!(commit.files.contains_key("a.txt"));
        assert!(repo.staging().is_empty().unwrap());
    }

    #[test]
    fn add_of_missing_file_fails() {
        let (_dir, repo) = init_repo();
        assert!(matches!(
            repo.add("ghost.txt"),
            Err(GitliteError::FileMissing)
        ));
    }

    #[test]
    fn add_rejects_names_the_record_cannot_hold() {
        let (_dir, repo) = init_repo();
        assert!(matches!(
            repo.add("a:b.txt"),
            Err(GitliteError::UnsupportedFileName { .. })
        ));
    }

    #[test]
    fn adding_unchanged_content_unstages() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "alpha");
        repo.commit("add a").unwrap();
        // Same content again: nothing to stage.
        repo.add("a.txt").unwrap();
        assert!(repo.staging().is_empty().unwrap());
        // And re-adding after an rm cancels the staged deletion.
        repo.rm("a.txt").unwrap();
        fs::write(repo.root().join("a.txt"), "alpha").unwrap();
        repo.add("a.txt").unwrap();
        assert!(repo.staging().is_empty().unwrap());
    }

    #[test]
    fn commit_guards_message_and_staging() {
        let (_dir, repo) = init_repo();
        assert!(matches!(repo.commit(""), Err(GitliteError::EmptyMessage)));
        assert!(matches!(
            repo.commit("nothing"),
            Err(GitliteError::NothingStaged)
        ));
    }

    #[test]
    fn rm_stages_deletion_and_removes_the_working_file() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "alpha");
        repo.commit("add a").unwrap();
        repo.rm("a.txt").unwrap();
        assert!(!repo.root().join("a.txt").exists());
        repo.commit("drop a").unwrap();
        assert!(!repo.head_commit().unwrap().files.contains_key("a.txt"));
    }

    #[test]
    fn rm_of_staged_only_file_just_unstages() {
        let (_dir, repo) = init_repo();
        fs::write(repo.root().join("new.txt"), "new").unwrap();
        repo.add("new.txt").unwrap();
        repo.rm("new.txt").unwrap();
        assert!(repo.staging().is_empty().unwrap());
        // Working file stays.
        assert!(repo.root().join("new.txt").exists());
    }

    #[test]
    fn rm_without_reason_fails() {
        let (_dir, repo) = init_repo();
        fs::write(repo.root().join("untracked.txt"), "x").unwrap();
        assert!(matches!(
            repo.rm("untracked.txt"),
            Err(GitliteError::NoReasonToRemove)
        ));
    }

    #[test]
    fn branch_create_and_delete_rules() {
        let (_dir, repo) = init_repo();
        repo.branch("feat").unwrap();
        assert!(matches!(
            repo.branch("feat"),
            Err(GitliteError::BranchExists)
        ));
        assert!(matches!(
            repo.rm_branch("master"),
            Err(GitliteError::RemoveCurrentBranch)
        ));
        assert!(matches!(
            repo.rm_branch("ghost"),
            Err(GitliteError::BranchMissing)
        ));
        repo.rm_branch("feat").unwrap();
        assert!(!repo.refs().branch_exists("feat"));
    }

    #[test]
    fn checkout_branch_restores_its_snapshot_exactly() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "alpha");
        repo.commit("add a").unwrap();
        repo.branch("feat").unwrap();
        write_and_add(&repo, "b.txt", "beta");
        repo.commit("add b").unwrap();

        repo.checkout_branch("feat").unwrap();
        assert_eq!(repo.head_branch().unwrap(), "feat");
        assert_eq!(
            fs::read_to_string(repo.root().join("a.txt")).unwrap(),
            "alpha"
        );
        assert!(!repo.root().join("b.txt").exists());
    }

    #[test]
    fn checkout_guards() {
        let (_dir, repo) = init_repo();
        assert!(matches!(
            repo.checkout_branch("ghost"),
            Err(GitliteError::NoSuchBranch)
        ));
        assert!(matches!(
            repo.checkout_branch("master"),
            Err(GitliteError::CheckoutCurrent)
        ));
    }

    #[test]
    fn checkout_refuses_to_overwrite_untracked_files() {
        let (_dir, repo) = init_repo();
        repo.branch("feat").unwrap();
        write_and_add(&repo, "a.txt", "committed");
        repo.commit("add a").unwrap();
        repo.checkout_branch("feat").unwrap();
        // `a.txt` is untracked on feat; recreate it with local content.
        fs::write(repo.root().join("a.txt"), "local work").unwrap();
        assert!(matches!(
            repo.checkout_branch("master"),
            Err(GitliteError::UntrackedInTheWay)
        ));
        // The check fired before any mutation.
        assert_eq!(
            fs::read_to_string(repo.root().join("a.txt")).unwrap(),
            "local work"
        );
    }

    #[test]
    fn checkout_file_restores_head_version() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "committed");
        repo.commit("add a").unwrap();
        fs::write(repo.root().join("a.txt"), "scribbled").unwrap();
        repo.checkout_file_from_head("a.txt").unwrap();
        assert_eq!(
            fs::read_to_string(repo.root().join("a.txt")).unwrap(),
            "committed"
        );
    }

    #[test]
    fn checkout_file_from_abbreviated_commit_id() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "v1");
        let first = repo.commit("v1").unwrap();
        write_and_add(&repo, "a.txt", "v2");
        repo.commit("v2").unwrap();

        let prefix = &first.as_str()[..8];
        repo.checkout_file(prefix, "a.txt").unwrap();
        assert_eq!(fs::read_to_string(repo.root().join("a.txt")).unwrap(), "v1");

        assert!(matches!(
            repo.checkout_file(prefix, "ghost.txt"),
            Err(GitliteError::FileNotInCommit)
        ));
        assert!(matches!(
            repo.checkout_file("ffffffff", "a.txt"),
            Err(GitliteError::NoSuchCommit)
        ));
    }

    #[test]
    fn reset_moves_the_branch_and_working_tree() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "v1");
        let first = repo.commit("v1").unwrap();
        write_and_add(&repo, "a.txt", "v2");
        write_and_add(&repo, "b.txt", "beta");
        repo.commit("v2").unwrap();

        repo.reset(first.as_str()).unwrap();
        assert_eq!(repo.head_commit_id().unwrap(), first);
        assert_eq!(repo.head_branch().unwrap(), "master");
        assert_eq!(fs::read_to_string(repo.root().join("a.txt")).unwrap(), "v1");
        assert!(!repo.root().join("b.txt").exists());
    }

    #[test]
    fn log_follows_first_parents_from_the_tip() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "v1");
        let c1 = repo.commit("v1").unwrap();
        write_and_add(&repo, "a.txt", "v2");
        let c2 = repo.commit("v2").unwrap();

        let entries = repo.log_entries().unwrap();
        let ids: Vec<&ObjectId> = entries.iter().map(|e| &e.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], &c2);
        assert_eq!(ids[1], &c1);
        assert_eq!(entries[2].commit.message, ROOT_MESSAGE);
    }

    #[test]
    fn log_rendering_has_the_fixed_shape() {
        let (_dir, repo) = init_repo();
        let entries = repo.log_entries().unwrap();
        let block = entries[0].render();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "===");
        assert_eq!(lines[1], format!("commit {}", entries[0].id));
        assert!(lines[2].starts_with("Date: "));
        assert_eq!(lines[3], ROOT_MESSAGE);
        assert!(block.ends_with("\n\n"));
    }

    #[test]
    fn find_matches_whole_messages_only() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "v1");
        let c1 = repo.commit("needle").unwrap();
        assert_eq!(repo.find("needle").unwrap(), vec![c1]);
        assert!(matches!(
            repo.find("need"),
            Err(GitliteError::NoCommitWithMessage)
        ));
    }

    #[test]
    fn global_log_sees_commits_on_all_branches() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "a.txt", "v1");
        repo.commit("on master").unwrap();
        repo.branch("feat").unwrap();
        repo.checkout_branch("feat").unwrap();
        write_and_add(&repo, "b.txt", "v2");
        repo.commit("on feat").unwrap();

        let messages: Vec<String> = repo
            .global_log_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.commit.message)
            .collect();
        assert!(messages.contains(&"on master".to_owned()));
        assert!(messages.contains(&"on feat".to_owned()));
        assert!(messages.contains(&ROOT_MESSAGE.to_owned()));
    }
}
