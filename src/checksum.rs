//! Checksum utilities for exported schema files

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// SHA256 checksum of schema text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum of text
    pub fn of_text(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Compute checksum of a file's contents, `None` if it cannot be read
    pub fn of_file(path: &Path) -> Option<Self> {
        std::fs::read(path).ok().map(|data| Self::from_bytes(&data))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        *self == Self::of_text(content)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"title": "Config", "type": "object"}"#;
        assert_eq!(Checksum::of_text(content), Checksum::of_text(content));
    }

    #[test]
    fn test_checksum_different_content() {
        assert_ne!(
            Checksum::of_text(r#"{"title": "A"}"#),
            Checksum::of_text(r#"{"title": "B"}"#)
        );
    }

    #[test]
    fn test_checksum_verification() {
        let content = r#"{"title": "Config"}"#;
        let checksum = Checksum::of_text(content);
        assert!(checksum.verify(content));
        assert!(!checksum.verify("different content"));
        assert_eq!(checksum.as_str().len(), 64);
    }

    #[test]
    fn test_checksum_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(Checksum::of_file(&path), Some(Checksum::of_text("{}")));
        assert_eq!(Checksum::of_file(&dir.path().join("missing.json")), None);
    }
}
