use std::collections::HashMap;

use super::{validate_key, KvBackend, KvError};

/// In-process backend. An optional quota caps the total stored bytes the way
/// browser storage does, so callers can exercise the failed-save path.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: HashMap<String, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses writes once the stored total would exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Seed raw bytes without quota checks.
    pub fn with_entry(mut self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn used_except(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KvBackend for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), KvError> {
        validate_key(key)?;
        if let Some(quota) = self.quota {
            let needed = self.used_except(key) + key.len() + value.len();
            if needed > quota {
                return Err(KvError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), KvError> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}
