//! Unified error type for repository operations.
//!
//! Every failure a command can surface is a [`GitliteError`] variant, and the
//! `Display` impl renders the exact single-line message the user sees. The
//! messages are part of the engine's observable contract, so they live here
//! in one place rather than scattered through the command code.

use std::fmt;

use crate::model::commit::RecordError;
use crate::model::types::ValidationError;

// ---------------------------------------------------------------------------
// GitliteError
// ---------------------------------------------------------------------------

/// Unified error type for all repository operations.
#[derive(Debug)]
pub enum GitliteError {
    /// `init` ran inside an already-initialized directory.
    RepoExists,
    /// A command other than `init` ran outside a repository.
    RepoMissing,
    /// `add` named a working-tree file that does not exist.
    FileMissing,
    /// `add` named a file whose name cannot be stored in a commit record.
    UnsupportedFileName {
        /// The rejected name.
        name: String,
    },
    /// `commit` was given an empty message.
    EmptyMessage,
    /// `commit` ran with an empty staging area.
    NothingStaged,
    /// `rm` named a file that is neither staged nor tracked.
    NoReasonToRemove,
    /// `checkout` named a branch that does not exist.
    NoSuchBranch,
    /// `rm-branch` or `merge` named a branch that does not exist.
    BranchMissing,
    /// `branch` named an existing branch.
    BranchExists,
    /// `checkout` named the branch that is already current.
    CheckoutCurrent,
    /// `rm-branch` named the current branch.
    RemoveCurrentBranch,
    /// A commit id (possibly abbreviated) matched no stored commit.
    NoSuchCommit,
    /// `checkout <commit> -- <file>` named a file absent from that commit.
    FileNotInCommit,
    /// `find` matched no commit message.
    NoCommitWithMessage,
    /// `merge` named the current branch.
    MergeWithSelf,
    /// `merge` ran with a non-empty staging area.
    UncommittedChanges,
    /// A checkout, reset, or merge would overwrite an untracked file.
    UntrackedInTheWay,
    /// `add-remote` named an existing remote.
    RemoteExists,
    /// A remote command named a remote that is not configured.
    RemoteMissing,
    /// The configured remote path is not a directory.
    RemoteDirMissing,
    /// `fetch` named a branch the remote does not have.
    RemoteBranchMissing,
    /// `push` would discard remote history.
    PushRejected,
    /// A stored record failed to parse or a referenced object is missing.
    Corrupt {
        /// Human-readable description of what is inconsistent.
        detail: String,
    },
    /// An I/O error outside the categories above.
    Io(std::io::Error),
}

impl GitliteError {
    /// Shorthand for a [`GitliteError::Corrupt`] with the given detail.
    #[must_use]
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::Corrupt {
            detail: detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for GitliteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepoExists => f.write_str(
                "A Gitlite version-control system already exists in the current directory.",
            ),
            Self::RepoMissing => f.write_str("Not in an initialized Gitlite directory."),
            Self::FileMissing => f.write_str("File does not exist."),
            Self::UnsupportedFileName { name } => {
                write!(f, "File name {name:?} contains unsupported characters.")
            }
            Self::EmptyMessage => f.write_str("Please enter a commit message."),
            Self::NothingStaged => f.write_str("No changes added to the commit."),
            Self::NoReasonToRemove => f.write_str("No reason to remove the file."),
            Self::NoSuchBranch => f.write_str("No such branch exists."),
            Self::BranchMissing => f.write_str("A branch with that name does not exist."),
            Self::BranchExists => f.write_str("A branch with that name already exists."),
            Self::CheckoutCurrent => f.write_str("No need to checkout the current branch."),
            Self::RemoveCurrentBranch => f.write_str("Cannot remove the current branch."),
            Self::NoSuchCommit => f.write_str("No commit with that id exists."),
            Self::FileNotInCommit => f.write_str("File does not exist in that commit."),
            Self::NoCommitWithMessage => f.write_str("Found no commit with that message."),
            Self::MergeWithSelf => f.write_str("Cannot merge a branch with itself."),
            Self::UncommittedChanges => f.write_str("You have uncommitted changes."),
            Self::UntrackedInTheWay => f.write_str(
                "There is an untracked file in the way; delete it, or add and commit it first.",
            ),
            Self::RemoteExists => f.write_str("A remote with that name already exists."),
            Self::RemoteMissing => f.write_str("A remote with that name does not exist."),
            Self::RemoteDirMissing => f.write_str("Remote directory not found."),
            Self::RemoteBranchMissing => f.write_str("That remote does not have that branch."),
            Self::PushRejected => {
                f.write_str("Please pull down remote changes before pushing.")
            }
            Self::Corrupt { detail } => write!(f, "Repository data is corrupted: {detail}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

// ---------------------------------------------------------------------------
// std::error::Error and From impls
// ---------------------------------------------------------------------------

impl std::error::Error for GitliteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GitliteError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<RecordError> for GitliteError {
    fn from(err: RecordError) -> Self {
        Self::Corrupt {
            detail: err.detail,
        }
    }
}

impl From<ValidationError> for GitliteError {
    fn from(err: ValidationError) -> Self {
        Self::Corrupt {
            detail: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
