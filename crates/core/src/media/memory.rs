use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{MediaError, ObjectBytes, ObjectStore};

/// Object store kept in memory. Paths containing one of the configured
/// failure markers are rejected, to exercise partial batch failures.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    base_url: String,
    objects: RwLock<HashMap<String, (Vec<u8>, String)>>,
    fail_markers: HashSet<String>,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_markers.insert(marker.into());
        self
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), MediaError> {
        if self.fail_markers.iter().any(|m| path.contains(m.as_str())) {
            return Err(MediaError::Backend {
                status: 500,
                body: format!("refused {path}"),
            });
        }
        let mut objects = self.objects.write().await;
        if objects.contains_key(path) {
            return Err(MediaError::Backend {
                status: 409,
                body: "The resource already exists".into(),
            });
        }
        objects.insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Option<ObjectBytes>, MediaError> {
        Ok(self
            .objects
            .read()
            .await
            .get(path)
            .map(|(bytes, content_type)| ObjectBytes {
                bytes: bytes.clone(),
                content_type: content_type.clone(),
            }))
    }

    async fn delete(&self, path: &str) -> Result<(), MediaError> {
        self.objects.write().await.remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}
