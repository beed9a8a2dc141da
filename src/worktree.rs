//! Working-tree sync: materializing a commit's file set safely.
//!
//! Files live in a flat top-level namespace next to the metadata directory.
//! State transitions follow a fixed order so a crash can only leave stale
//! working files, never a branch ref pointing at a half-materialized
//! snapshot:
//!
//! 1. untracked-overwrite check (no side effects),
//! 2. write every target file,
//! 3. delete files tracked by the base but absent from the target,
//! 4. caller updates the ref,
//! 5. caller clears staging.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::GitliteError;
use crate::fsutil;
use crate::model::ObjectId;
use crate::objects::ObjectStore;
use crate::repo::META_DIR;
use crate::staging::StagingArea;

/// Top-level working-tree filenames, sorted ascending. The metadata
/// directory is excluded; subdirectories are not tracked.
///
/// # Errors
/// Returns an I/O error if the directory cannot be enumerated.
pub fn working_files(root: &Path) -> Result<Vec<String>, GitliteError> {
    Ok(fsutil::plain_filenames_in(root)?
        .into_iter()
        .filter(|name| name != META_DIR)
        .collect())
}

/// Fail if switching from `base` to `target` would overwrite an untracked
/// working file: one present in the working tree and in `target`, absent
/// from `base`, and not staged for addition.
///
/// Performs no side effects; run before any working-tree mutation.
///
/// # Errors
/// [`GitliteError::UntrackedInTheWay`] when the condition holds.
pub fn check_untracked_overwrites(
    root: &Path,
    staging: &StagingArea,
    target_files: &BTreeMap<String, ObjectId>,
    base_files: &BTreeMap<String, ObjectId>,
) -> Result<(), GitliteError> {
    for name in working_files(root)? {
        if target_files.contains_key(&name) && !base_files.contains_key(&name) {
            let staged_addition = staging
                .get(&name)?
                .is_some_and(|entry| entry.is_addition());
            if !staged_addition {
                return Err(GitliteError::UntrackedInTheWay);
            }
        }
    }
    Ok(())
}

/// Write every file in `target_files` and delete files tracked only by
/// `base_files`.
///
/// Callers must run [`check_untracked_overwrites`] first; this function
/// mutates the working tree unconditionally.
///
/// # Errors
/// Fails with corruption when a target blob is missing from the store, or
/// with an I/O error when a file cannot be written or removed.
pub fn materialize(
    root: &Path,
    store: &ObjectStore,
    target_files: &BTreeMap<String, ObjectId>,
    base_files: &BTreeMap<String, ObjectId>,
) -> Result<(), GitliteError> {
    for (name, blob) in target_files {
        fs::write(root.join(name), store.get(blob)?)?;
    }
    for name in base_files.keys() {
        if !target_files.contains_key(name) {
            fsutil::remove_file_if_exists(&root.join(name))?;
        }
    }
    debug!(
        written = target_files.len(),
        base = base_files.len(),
        "materialized working tree"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
