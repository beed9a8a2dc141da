//! Content-addressed object store.
//!
//! Blobs and commit records live together in one flat directory, keyed by
//! the 40-hex SHA-1 of their bytes. Writes are atomic and idempotent: two
//! objects with the same bytes share a key, and a lost rename race means the
//! identical content is already present.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GitliteError;
use crate::fsutil;
use crate::model::{Commit, ObjectId};

// ---------------------------------------------------------------------------
// ObjectStore
// ---------------------------------------------------------------------------

/// Read/write access to one repository's `objects/` directory.
pub struct ObjectStore {
    dir: PathBuf,
}

impl ObjectStore {
    /// Open the store rooted at `dir`.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    /// Store `bytes` under their SHA-1 key and return the key.
    ///
    /// # Errors
    /// Returns an I/O error if the object file cannot be written.
    pub fn put(&self, bytes: &[u8]) -> Result<ObjectId, GitliteError> {
        let id = ObjectId::new(&fsutil::sha1_hex(bytes))?;
        fsutil::write_atomic_noclobber(&self.object_path(&id), bytes)?;
        debug!(id = %id, len = bytes.len(), "stored object");
        Ok(id)
    }

    /// Store a commit record and return its id.
    ///
    /// # Errors
    /// Returns an I/O error if the object file cannot be written.
    pub fn put_commit(&self, commit: &Commit) -> Result<ObjectId, GitliteError> {
        self.put(&commit.encode())
    }

    /// Read an object's bytes.
    ///
    /// # Errors
    /// A missing object is corruption: something referenced an id that is
    /// not in the store.
    pub fn get(&self, id: &ObjectId) -> Result<Vec<u8>, GitliteError> {
        match fs::read(self.object_path(id)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(GitliteError::corrupt(
                format!("object {id} is referenced but missing"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and parse a commit record.
    ///
    /// # Errors
    /// Fails with corruption if the object is missing or does not parse.
    pub fn read_commit(&self, id: &ObjectId) -> Result<Commit, GitliteError> {
        let bytes = self.get(id)?;
        Commit::parse(&bytes)
            .map_err(|e| GitliteError::corrupt(format!("commit {id}: {}", e.detail)))
    }

    /// Whether an object with this id is present.
    #[must_use]
    pub fn has(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// All object ids in the store, sorted ascending.
    ///
    /// Directory entries that are not valid object keys (e.g. a temp file
    /// left by an interrupted write) are ignored.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be enumerated.
    pub fn list_ids(&self) -> Result<Vec<ObjectId>, GitliteError> {
        let names = fsutil::plain_filenames_in(&self.dir)?;
        Ok(names
            .iter()
            .filter_map(|name| ObjectId::new(name).ok())
            .collect())
    }

    /// The store's directory on disk.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn store() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();
        let objects = dir.path().join("objects");
        fs::create_dir_all(&objects).unwrap();
        (dir, ObjectStore::new(objects))
    }

    #[test]
    fn get_returns_what_put_stored() {
        let (_dir, store) = store();
        let id = store.put(b"some file content\n").unwrap();
        assert_eq!(store.get(&id).unwrap(), b"some file content\n");
        assert!(store.has(&id));
    }

    #[test]
    fn put_is_idempotent_and_leaves_one_file() {
        let (_dir, store) = store();
        let first = store.put(b"dup").unwrap();
        let second = store.put(b"dup").unwrap();
        assert_eq!(first, second);
        assert_eq!(store.list_ids().unwrap(), vec![first]);
    }

    #[test]
    fn get_of_missing_object_reports_corruption() {
        let (_dir, store) = store();
        let id = ObjectId::new(&"0".repeat(40)).unwrap();
        assert!(matches!(
            store.get(&id),
            Err(GitliteError::Corrupt { .. })
        ));
    }

    #[test]
    fn listing_skips_non_object_entries() {
        let (_dir, store) = store();
        let id = store.put(b"content").unwrap();
        fs::write(store.dir().join(".tmpXYZ"), b"leftover").unwrap();
        assert_eq!(store.list_ids().unwrap(), vec![id]);
    }

    #[test]
    fn commit_records_round_trip() {
        let (_dir, store) = store();
        let blob = store.put(b"blob").unwrap();
        let commit = Commit {
            parents: vec![],
            timestamp: 0,
            message: "initial commit".to_owned(),
            files: BTreeMap::from([("a.txt".to_owned(), blob)]),
        };
        let id = store.put_commit(&commit).unwrap();
        assert_eq!(store.read_commit(&id).unwrap(), commit);
    }

    proptest! {
        #[test]
        fn any_bytes_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let (_dir, store) = store();
            let id = store.put(&bytes).unwrap();
            prop_assert_eq!(store.get(&id).unwrap(), bytes);
            // Re-putting identical bytes yields the identical key.
            let again = store.put(&store.get(&id).unwrap()).unwrap();
            prop_assert_eq!(again, id);
        }
    }
}
