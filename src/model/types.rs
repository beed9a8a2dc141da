//! Foundation types: validated content-addressed object identifiers.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// A validated 40-character lowercase hex object ID (SHA-1).
///
/// Identifies both blobs and commit records in the object store. The id of
/// an object is the SHA-1 digest of its stored bytes, so equal content
/// always yields an equal id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create a new `ObjectId` from a string, validating format.
    ///
    /// # Errors
    /// Returns an error if the string is not exactly 40 lowercase hex
    /// characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Self::validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Return the inner hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The abbreviated 7-character form used in merge log lines.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..7]
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        if s.len() != 40 {
            return Err(ValidationError {
                value: s.to_owned(),
                reason: format!("expected 40 hex characters, got {}", s.len()),
            });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(ValidationError {
                value: s.to_owned(),
                reason: "must contain only lowercase hex characters (0-9, a-f)".to_owned(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A string failed validation as an [`ObjectId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// The rejected input.
    pub value: String,
    /// Why it was rejected.
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid object id {:?}: {}", self.value, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_40_hex() {
        let id = ObjectId::new("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(id.as_str(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(id.short(), "da39a3e");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(ObjectId::new("abc123").is_err());
        assert!(ObjectId::new("").is_err());
    }

    #[test]
    fn rejects_uppercase_and_non_hex() {
        assert!(ObjectId::new("DA39A3EE5E6B4B0D3255BFEF95601890AFD80709").is_err());
        assert!(ObjectId::new("zz39a3ee5e6b4b0d3255bfef95601890afd80709").is_err());
    }

    #[test]
    fn orders_lexicographically() {
        let a = ObjectId::new("0000000000000000000000000000000000000001").unwrap();
        let b = ObjectId::new("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }
}
