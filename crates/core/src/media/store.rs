use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid folder: {0}")]
    InvalidFolder(String),

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("empty upload: {0}")]
    Empty(String),

    #[error("storage returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url is not served by this storage: {0}")]
    ForeignUrl(String),
}

/// A stored object's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectBytes {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Bucket-scoped object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`. Existing objects are not overwritten.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), MediaError>;

    /// Read an object back, `None` when nothing is stored at `path`.
    async fn get(&self, path: &str) -> Result<Option<ObjectBytes>, MediaError>;

    async fn delete(&self, path: &str) -> Result<(), MediaError>;

    /// Public URL an object is served from.
    fn public_url(&self, path: &str) -> String;

    /// Inverse of [`ObjectStore::public_url`].
    fn path_from_public_url(&self, url: &str) -> Option<String> {
        let prefix = self.public_url("");
        url.strip_prefix(&prefix)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}
