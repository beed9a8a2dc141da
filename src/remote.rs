//! Remote engine: object and ref transfer between two on-disk repositories.
//!
//! A remote is a name mapped to the filesystem path of another repository's
//! metadata directory. All transfer is synchronous file copying between the
//! two object stores:
//!
//! - **push** refuses unless the remote tip is reachable from the local tip
//!   (no history is ever discarded), then copies every missing commit and
//!   referenced blob outward and advances the remote branch ref.
//! - **fetch** copies the remote branch's reachable objects inward and
//!   records the tip under the remote-tracking ref `refs/heads/<name>/<b>`.
//! - **pull** is fetch followed by a merge of the tracking ref.
//!
//! Blobs are copied before the commit that references them, and refs are
//! written only after all objects landed, so an interrupted transfer never
//! leaves a ref pointing at missing objects.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::info;

use crate::error::GitliteError;
use crate::history;
use crate::merge::{self, MergeOutcome};
use crate::model::ObjectId;
use crate::objects::ObjectStore;
use crate::refs::RefStore;
use crate::repo::Repository;

// ---------------------------------------------------------------------------
// Remote table management
// ---------------------------------------------------------------------------

/// Register a remote name for a repository path (stored verbatim).
///
/// # Errors
/// [`GitliteError::RemoteExists`] when the name is taken.
pub fn add_remote(repo: &Repository, name: &str, path: &str) -> Result<(), GitliteError> {
    if repo.refs().remote_exists(name) {
        return Err(GitliteError::RemoteExists);
    }
    repo.refs().write_remote(name, path)
}

/// Drop a remote from the table. Tracking refs are left in place.
///
/// # Errors
/// [`GitliteError::RemoteMissing`] when the name is not configured.
pub fn rm_remote(repo: &Repository, name: &str) -> Result<(), GitliteError> {
    if !repo.refs().remote_exists(name) {
        return Err(GitliteError::RemoteMissing);
    }
    repo.refs().remove_remote(name)
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// Handles onto the other repository's stores.
struct RemoteEnd {
    store: ObjectStore,
    refs: RefStore,
}

fn open_remote(repo: &Repository, name: &str) -> Result<RemoteEnd, GitliteError> {
    let Some(path) = repo.refs().remote_path(name)? else {
        return Err(GitliteError::RemoteMissing);
    };
    let dir = PathBuf::from(path);
    if !dir.is_dir() {
        return Err(GitliteError::RemoteDirMissing);
    }
    Ok(RemoteEnd {
        store: ObjectStore::new(dir.join("objects")),
        refs: RefStore::new(dir),
    })
}

/// Push the current branch's history to `<remote>/refs/heads/<branch>`.
///
/// A missing remote branch is created; an existing one must be an ancestor
/// of the local tip.
///
/// # Errors
/// [`GitliteError::RemoteMissing`], [`GitliteError::RemoteDirMissing`], or
/// [`GitliteError::PushRejected`].
pub fn push(repo: &Repository, remote_name: &str, branch: &str) -> Result<(), GitliteError> {
    let remote = open_remote(repo, remote_name)?;
    let local_store = repo.objects();
    let local_tip = repo.head_commit_id()?;
    let reachable = history::ancestors(&local_store, &local_tip)?;

    if let Some(remote_tip) = remote.refs.read_branch(branch)? {
        if !reachable.contains(&remote_tip) {
            return Err(GitliteError::PushRejected);
        }
    }

    let copied = copy_objects(&local_store, &remote.store, &reachable)?;
    remote.refs.write_branch(branch, &local_tip)?;
    info!(remote = remote_name, branch, copied, tip = %local_tip, "pushed");
    Ok(())
}

/// Import `<remote>/refs/heads/<branch>` and everything reachable from it,
/// then record the tip under the local tracking ref.
///
/// # Errors
/// [`GitliteError::RemoteMissing`], [`GitliteError::RemoteDirMissing`], or
/// [`GitliteError::RemoteBranchMissing`].
pub fn fetch(repo: &Repository, remote_name: &str, branch: &str) -> Result<(), GitliteError> {
    let remote = open_remote(repo, remote_name)?;
    let Some(remote_tip) = remote.refs.read_branch(branch)? else {
        return Err(GitliteError::RemoteBranchMissing);
    };
    let reachable = history::ancestors(&remote.store, &remote_tip)?;
    let copied = copy_objects(&remote.store, &repo.objects(), &reachable)?;
    repo.refs()
        .write_branch(&format!("{remote_name}/{branch}"), &remote_tip)?;
    info!(remote = remote_name, branch, copied, tip = %remote_tip, "fetched");
    Ok(())
}

/// Fetch, then merge the tracking ref into the current branch.
///
/// # Errors
/// Everything [`fetch`] and [`merge::merge`] can fail with.
pub fn pull(
    repo: &Repository,
    remote_name: &str,
    branch: &str,
) -> Result<MergeOutcome, GitliteError> {
    fetch(repo, remote_name, branch)?;
    merge::merge(repo, &format!("{remote_name}/{branch}"))
}

/// Copy each commit in `commits`, plus every blob its snapshot references,
/// from `src` into `dst`. Objects already present are skipped; blobs land
/// before the commit that references them.
fn copy_objects(
    src: &ObjectStore,
    dst: &ObjectStore,
    commits: &HashSet<ObjectId>,
) -> Result<usize, GitliteError> {
    let mut ordered: Vec<&ObjectId> = commits.iter().collect();
    ordered.sort();

    let mut copied = 0;
    for id in ordered {
        let commit = src.read_commit(id)?;
        for blob in commit.files.values() {
            if !dst.has(blob) {
                dst.put(&src.get(blob)?)?;
                copied += 1;
            }
        }
        if !dst.has(id) {
            dst.put(&src.get(id)?)?;
            copied += 1;
        }
    }
    Ok(copied)
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

    #[test]
    fn remote_table_guards() {
        let (_dir, repo) = init_repo();
        add_remote(&repo, "origin", "/somewhere/.gitlite").unwrap();
        assert!(matches!(
            add_remote(&repo, "origin", "/elsewhere/.gitlite"),
            Err(GitliteError::RemoteExists)
        ));
        rm_remote(&repo, "origin").unwrap();
        assert!(matches!(
            rm_remote(&repo, "origin"),
            Err(GitliteError::RemoteMissing)
        ));
    }

    #[test]
    fn transfer_against_unconfigured_or_missing_remotes() {
        let (_dir, repo) = init_repo();
        assert!(matches!(
            push(&repo, "origin", "master"),
            Err(GitliteError::RemoteMissing)
        ));
        add_remote(&repo, "origin", "/nonexistent/.gitlite").unwrap();
        assert!(matches!(
            push(&repo, "origin", "master"),
            Err(GitliteError::RemoteDirMissing)
        ));
        assert!(matches!(
            fetch(&repo, "origin", "master"),
            Err(GitliteError::RemoteDirMissing)
        ));
    }

    #[test]
    fn fetch_of_unknown_remote_branch_fails() {
        let (_local_dir, local) = init_repo();
        let (remote_dir, _remote) = init_repo();
        let meta = remote_dir.path().join(crate::repo::META_DIR);
        add_remote(&local, "origin", meta.to_str().unwrap()).unwrap();
        assert!(matches!(
            fetch(&local, "origin", "ghost"),
            Err(GitliteError::RemoteBranchMissing)
        ));
    }
}
