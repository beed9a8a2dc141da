//! Repository status: branches, staged intents, unstaged drift, untracked
//! files.
//!
//! Collection and rendering are separate so tests can assert on the
//! structured report while the CLI prints the fixed five-section layout.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use crate::error::GitliteError;
use crate::fsutil;
use crate::repo::Repository;
use crate::staging::StageEntry;
use crate::worktree;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// How an unstaged working-tree change diverges from its staged or tracked
/// version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModKind {
    /// Content differs from the staged or tracked blob.
    Modified,
    /// The working file is gone without a staged deletion.
    Deleted,
}

impl ModKind {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Modified => " (modified)",
            Self::Deleted => " (deleted)",
        }
    }
}

/// Structured `status` output. All lists are sorted ascending.
#[derive(Debug)]
pub struct StatusReport {
    /// The branch `HEAD` is on.
    pub current_branch: String,
    /// All local branches, current included.
    pub branches: Vec<String>,
    /// Names staged for addition.
    pub staged: Vec<String>,
    /// Names staged for removal.
    pub removed: Vec<String>,
    /// Unstaged drift between the working tree and staged/tracked state.
    pub modifications: Vec<(String, ModKind)>,
    /// Working files that are neither staged nor tracked.
    pub untracked: Vec<String>,
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Collect the full status of `repo`.
///
/// # Errors
/// Fails when HEAD, the staging area, or the object store is unreadable.
pub fn collect(repo: &Repository) -> Result<StatusReport, GitliteError> {
    let current_branch = repo.head_branch()?;
    let branches = repo.refs().list_branches()?;
    let entries = repo.staging().entries()?;
    let tracked = repo.head_commit()?.files;
    let working: BTreeSet<String> = worktree::working_files(repo.root())?.into_iter().collect();

    let mut staged = Vec::new();
    let mut removed = Vec::new();
    for (name, entry) in &entries {
        match entry {
            StageEntry::Add(_) => staged.push(name.clone()),
            StageEntry::Remove => removed.push(name.clone()),
        }
    }

    let modifications = classify_drift(repo, &entries, &tracked, &working)?;

    let untracked = working
        .iter()
        .filter(|name| !entries.contains_key(*name) && !tracked.contains_key(*name))
        .cloned()
        .collect();

    Ok(StatusReport {
        current_branch,
        branches,
        staged,
        removed,
        modifications,
        untracked,
    })
}

/// A file is `(modified)` when its working content differs from its staged
/// blob (if staged for addition) or its tracked blob (if unstaged), and
/// `(deleted)` when the working copy is missing without a staged deletion.
fn classify_drift(
    repo: &Repository,
    entries: &BTreeMap<String, StageEntry>,
    tracked: &BTreeMap<String, crate::model::ObjectId>,
    working: &BTreeSet<String>,
) -> Result<Vec<(String, ModKind)>, GitliteError> {
    let mut candidates: BTreeSet<&String> = tracked.keys().collect();
    candidates.extend(entries.keys());

    let mut drift = Vec::new();
    for name in candidates {
        match entries.get(name) {
            Some(StageEntry::Add(staged_blob)) => {
                if working.contains(name) {
                    if working_blob_id(repo, name)? != staged_blob.as_str() {
                        drift.push((name.clone(), ModKind::Modified));
                    }
                } else {
                    drift.push((name.clone(), ModKind::Deleted));
                }
            }
            // Staged deletions are reported in the Removed section.
            Some(StageEntry::Remove) => {}
            None => {
                if let Some(tracked_blob) = tracked.get(name) {
                    if working.contains(name) {
                        if working_blob_id(repo, name)? != tracked_blob.as_str() {
                            drift.push((name.clone(), ModKind::Modified));
                        }
                    } else {
                        drift.push((name.clone(), ModKind::Deleted));
                    }
                }
            }
        }
    }
    Ok(drift)
}

fn working_blob_id(repo: &Repository, name: &str) -> Result<String, GitliteError> {
    Ok(fsutil::sha1_hex(&fs::read(repo.root().join(name))?))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl StatusReport {
    /// Render the five fixed sections, one blank line between sections.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("=== Branches ===\n");
        for branch in &self.branches {
            if *branch == self.current_branch {
                out.push('*');
            }
            out.push_str(branch);
            out.push('\n');
        }

        out.push_str("\n=== Staged Files ===\n");
        for name in &self.staged {
            out.push_str(name);
            out.push('\n');
        }

        out.push_str("\n=== Removed Files ===\n");
        for name in &self.removed {
            out.push_str(name);
            out.push('\n');
        }

        out.push_str("\n=== Modifications Not Staged For Commit ===\n");
        for (name, kind) in &self.modifications {
            out.push_str(name);
            out.push_str(kind.suffix());
            out.push('\n');
        }

        out.push_str("\n=== Untracked Files ===\n");
        for name in &self.untracked {
            out.push_str(name);
            out.push('\n');
        }

        out
    }
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
    fn clean_repository_has_only_branch_content() {
        let (_dir, repo) = init_repo();
        let report = collect(&repo).unwrap();
        assert_eq!(report.branches, vec!["master".to_owned()]);
        assert!(report.staged.is_empty());
        assert!(report.removed.is_empty());
        assert!(report.modifications.is_empty());
        assert!(report.untracked.is_empty());
        assert_eq!(
            report.render(),
            "=== Branches ===\n\
             *master\n\
             \n=== Staged Files ===\n\
             \n=== Removed Files ===\n\
             \n=== Modifications Not Staged For Commit ===\n\
             \n=== Untracked Files ===\n"
        );
    }

    #[test]
    fn sections_fill_in_sorted_order() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "tracked.txt", "v1");
        repo.commit("base").unwrap();
        repo.branch("alpha").unwrap();

        write_and_add(&repo, "b-staged.txt", "b");
        write_and_add(&repo, "a-staged.txt", "a");
        repo.rm("tracked.txt").unwrap();
        fs::write(repo.root().join("loose.txt"), "??").unwrap();

        let report = collect(&repo).unwrap();
        assert_eq!(report.branches, vec!["alpha".to_owned(), "master".to_owned()]);
        assert_eq!(report.current_branch, "master");
        assert_eq!(
            report.staged,
            vec!["a-staged.txt".to_owned(), "b-staged.txt".to_owned()]
        );
        assert_eq!(report.removed, vec!["tracked.txt".to_owned()]);
        assert_eq!(report.untracked, vec!["loose.txt".to_owned()]);

        let rendered = report.render();
        assert!(rendered.contains("=== Branches ===\nalpha\n*master\n"));
    }

    #[test]
    fn drift_classification_covers_all_four_clauses() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "tracked-modified.txt", "v1");
        write_and_add(&repo, "tracked-deleted.txt", "v1");
        repo.commit("base").unwrap();

        // Tracked, unstaged, content drifted.
        fs::write(repo.root().join("tracked-modified.txt"), "v2").unwrap();
        // Tracked, not staged for deletion, working copy gone.
        fs::remove_file(repo.root().join("tracked-deleted.txt")).unwrap();
        // Staged addition, then drifted.
        write_and_add(&repo, "staged-modified.txt", "staged");
        fs::write(repo.root().join("staged-modified.txt"), "drifted").unwrap();
        // Staged addition, then deleted.
        write_and_add(&repo, "staged-deleted.txt", "staged");
        fs::remove_file(repo.root().join("staged-deleted.txt")).unwrap();

        let report = collect(&repo).unwrap();
        assert_eq!(
            report.modifications,
            vec![
                ("staged-deleted.txt".to_owned(), ModKind::Deleted),
                ("staged-modified.txt".to_owned(), ModKind::Modified),
                ("tracked-deleted.txt".to_owned(), ModKind::Deleted),
                ("tracked-modified.txt".to_owned(), ModKind::Modified),
            ]
        );
        let rendered = report.render();
        assert!(rendered.contains("staged-modified.txt (modified)\n"));
        assert!(rendered.contains("tracked-deleted.txt (deleted)\n"));
    }

    #[test]
    fn staged_deletion_is_not_drift_or_untracked() {
        let (_dir, repo) = init_repo();
        write_and_add(&repo, "gone.txt", "v1");
        repo.commit("base").unwrap();
        repo.rm("gone.txt").unwrap();
        let report = collect(&repo).unwrap();
        assert_eq!(report.removed, vec!["gone.txt".to_owned()]);
        assert!(report.modifications.is_empty());
        assert!(report.untracked.is_empty());
    }
}
