//! Key/value persistence for the content document.
//!
//! The content store reads and writes one serialized document under a single
//! key; backends only need whole-value get/put/remove.

pub mod file;
pub mod memory;

pub use file::FileKv;
pub use memory::MemoryKv;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Whole-value key/value storage backend.
pub trait KvBackend: Send + Sync {
    /// Read the bytes stored under `key`, `None` when nothing is stored.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Replace whatever is stored under `key`.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), KvError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), KvError>;
}

impl<B: KvBackend + ?Sized> KvBackend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), KvError> {
        (**self).put(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), KvError> {
        (**self).remove(key)
    }
}

/// Keys become file names, so only a conservative character set is accepted.
pub(crate) fn validate_key(key: &str) -> Result<(), KvError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(KvError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_keys() {
        assert!(validate_key("churchData").is_ok());
        assert!(validate_key("site-content_v2.backup").is_ok());
    }

    #[test]
    fn rejects_path_like_keys() {
        assert!(matches!(validate_key(""), Err(KvError::InvalidKey(_))));
        assert!(matches!(validate_key("../etc"), Err(KvError::InvalidKey(_))));
        assert!(matches!(validate_key("a/b"), Err(KvError::InvalidKey(_))));
        assert!(matches!(validate_key(".hidden"), Err(KvError::InvalidKey(_))));
    }
}
