//! Three-way merge: split-point case analysis, conflict synthesis, and
//! merge-commit creation.
//!
//! For every filename known to the split point, the current tip, or the
//! given tip, the engine compares the blob on each side against the split
//! (absence is distinct from any blob):
//!
//! - changed only on the given side → take the given version (stage it),
//! - changed only on the current side (or deleted there) → keep current,
//! - changed the same way on both sides → keep,
//! - changed differently on both sides → conflict.
//!
//! A conflict writes a marker blob over the working file and stages it, so
//! `status` shows the file and a follow-up `commit` persists the resolved
//! state. The marker bytes are frozen (CRLF after each marker line) because
//! they feed the blob's SHA-1 identity.
//!
//! Ancestor and fast-forward relationships short-circuit before any case
//! analysis; both are detected by comparing the split point against the two
//! tips.

use std::collections::BTreeSet;
use std::fs;

use tracing::{debug, info};

use crate::error::GitliteError;
use crate::fsutil;
use crate::history;
use crate::model::ObjectId;
use crate::objects::ObjectStore;
use crate::repo::Repository;
use crate::worktree;

// ---------------------------------------------------------------------------
// MergeOutcome
// ---------------------------------------------------------------------------

/// What a merge did. The CLI prints [`MergeOutcome::message`] when present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given branch is already reachable from the current tip; nothing
    /// changed.
    AlreadyAncestor,
    /// The current tip was an ancestor of the given branch; the current
    /// branch moved up to the given tip.
    FastForward,
    /// A real merge commit was created.
    Merged(ObjectId),
    /// Conflicts were written to the working tree and staged; no commit was
    /// created.
    Conflicted,
}

impl MergeOutcome {
    /// The fixed line to print for this outcome, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyAncestor => {
                Some("Given branch is an ancestor of the current branch.")
            }
            Self::FastForward => Some("Current branch fast-forwarded."),
            Self::Conflicted => Some("Encountered a merge conflict."),
            Self::Merged(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

/// Merge `target_branch` into the current branch.
///
/// # Errors
/// [`GitliteError::MergeWithSelf`], [`GitliteError::BranchMissing`],
/// [`GitliteError::UncommittedChanges`], or
/// [`GitliteError::UntrackedInTheWay`]; corruption errors surface from the
/// underlying stores.
pub fn merge(repo: &Repository, target_branch: &str) -> Result<MergeOutcome, GitliteError> {
    let current_branch = repo.head_branch()?;
    if current_branch == target_branch {
        return Err(GitliteError::MergeWithSelf);
    }
    let Some(target_tip) = repo.refs().read_branch(target_branch)? else {
        return Err(GitliteError::BranchMissing);
    };
    let staging = repo.staging();
    if !staging.is_empty()? {
        return Err(GitliteError::UncommittedChanges);
    }

    let head_tip = repo.head_commit_id()?;
    let store = repo.objects();
    let current = store.read_commit(&head_tip)?;
    let given = store.read_commit(&target_tip)?;

    // No side effects happen before this check.
    worktree::check_untracked_overwrites(repo.root(), &staging, &given.files, &current.files)?;

    let split_id = history::split_point(&store, &head_tip, &target_tip)?;
    if split_id == target_tip {
        return Ok(MergeOutcome::AlreadyAncestor);
    }
    if split_id == head_tip {
        repo.reset_to(&target_tip)?;
        info!(branch = target_branch, "fast-forwarded");
        return Ok(MergeOutcome::FastForward);
    }
    let split = store.read_commit(&split_id)?;
    debug!(split = %split_id, current = %head_tip, given = %target_tip, "merging");

    let mut conflicted = false;
    let names: BTreeSet<&String> = split
        .files
        .keys()
        .chain(current.files.keys())
        .chain(given.files.keys())
        .collect();
    for name in names {
        let s = split.files.get(name);
        let c = current.files.get(name);
        let g = given.files.get(name);
        let modified_current = c != s;
        let modified_given = g != s;

        if modified_given && !modified_current {
            // Only the given side changed this file: take its version.
            match g {
                Some(blob) => {
                    fs::write(repo.root().join(name), store.get(blob)?)?;
                    staging.stage_addition(name, blob)?;
                }
                None => {
                    fsutil::remove_file_if_exists(&repo.root().join(name))?;
                    staging.stage_removal(name)?;
                }
            }
        } else if modified_current && modified_given && c != g {
            // Changed differently on both sides, including modify/delete in
            // either direction and divergent additions.
            let blob = write_conflict(repo, &store, name, c, g)?;
            staging.stage_addition(name, &blob)?;
            conflicted = true;
        }
        // Every other case keeps the current side: untouched files,
        // current-only changes or deletions, identical changes on both
        // sides, and both-deleted.
    }

    if conflicted {
        return Ok(MergeOutcome::Conflicted);
    }

    let message = format!("Merged {target_branch} into {current_branch}.");
    let entries = staging.entries()?;
    let id = repo.commit_staged(&message, vec![head_tip, target_tip], &entries)?;
    info!(id = %id, branch = target_branch, "merged");
    Ok(MergeOutcome::Merged(id))
}

/// Overwrite the working file with conflict markers around both versions
/// and store the marker blob. Either side may be absent (deleted).
fn write_conflict(
    repo: &Repository,
    store: &ObjectStore,
    name: &str,
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
) -> Result<ObjectId, GitliteError> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"<<<<<<< HEAD\r\n");
    if let Some(blob) = current {
        bytes.extend_from_slice(&store.get(blob)?);
    }
    bytes.extend_from_slice(b"=======\r\n");
    if let Some(blob) = given {
        bytes.extend_from_slice(&store.get(blob)?);
    }
    bytes.extend_from_slice(b">>>>>>>\r\n");

    fs::write(repo.root().join(name), &bytes)?;
    store.put(&bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
