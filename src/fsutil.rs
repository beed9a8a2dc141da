//! Filesystem utility layer: content hashing, atomic writes, flat directory
//! listing, and the epoch clock.
//!
//! Object and ref files are written via write-temp-then-rename so a crash
//! leaves either the old or the new content, never a torn file. Object
//! writes use the noclobber variant: the store is content-addressed, so an
//! existing file with the same name already holds the same bytes and wins.

use std::fs;
use std::io;
use std::io::Write as _;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use sha1::{Digest, Sha1};
use tempfile::NamedTempFile;

/// SHA-1 digest of `bytes` as a 40-character lowercase hex string.
#[must_use]
pub fn sha1_hex(bytes: &[u8]) -> String {
    let digest = Sha1::digest(bytes);
    let mut hex = String::with_capacity(40);
    for b in &digest {
        use std::fmt::Write as _;
        let _ = write!(hex, "{b:02x}");
    }
    hex
}

/// Write `bytes` to `path` atomically (temp file in the same directory,
/// then rename over the destination).
///
/// # Errors
/// Returns the underlying I/O error; `path` must have a parent directory.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = parent_dir(path)?;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Like [`write_atomic`], but never replaces an existing file.
///
/// For content-addressed paths an existing file already holds these bytes,
/// so losing the race (or finding the file present) is success.
///
/// # Errors
/// Returns the underlying I/O error for anything other than "already there".
pub fn write_atomic_noclobber(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    let dir = parent_dir(path)?;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    match temp.persist_noclobber(path) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e.error),
    }
}

fn parent_dir(path: &Path) -> io::Result<&Path> {
    path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
    })
}

/// Names of the plain files directly inside `dir`, sorted ascending.
///
/// Non-recursive; subdirectories are excluded. A missing directory yields an
/// empty list. Names that are not valid UTF-8 are skipped — the engine's
/// namespace is textual.
///
/// # Errors
/// Returns the underlying I/O error for anything other than a missing `dir`.
pub fn plain_filenames_in(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(names),
        Err(e) => return Err(e),
    };
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Delete `path` if it exists; missing is not an error.
///
/// # Errors
/// Returns the underlying I/O error for any other failure.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Recursively delete `path` if it exists; missing is not an error.
///
/// # Errors
/// Returns the underlying I/O error for any other failure.
pub fn rmtree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Current time as whole seconds since the epoch.
///
/// A clock set before the epoch reads as 0 rather than failing; commit
/// timestamps are informational.
#[must_use]
pub fn epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sha1_matches_known_digests() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            sha1_hex(b"hello"),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ref");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");
    }

    #[test]
    fn noclobber_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object");
        write_atomic_noclobber(&path, b"original").unwrap();
        write_atomic_noclobber(&path, b"different").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn listing_is_sorted_files_only_and_tolerates_missing_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        assert_eq!(
            plain_filenames_in(dir.path()).unwrap(),
            vec!["a.txt".to_owned(), "b.txt".to_owned()]
        );
        assert!(
            plain_filenames_in(&dir.path().join("nope"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn delete_helpers_tolerate_missing_targets() {
        let dir = TempDir::new().unwrap();
        remove_file_if_exists(&dir.path().join("ghost")).unwrap();
        rmtree(&dir.path().join("ghost-dir")).unwrap();
    }
}
