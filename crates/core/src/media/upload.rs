use chrono::{DateTime, Utc};
use serde::Serialize;

use super::path::{object_path, MediaFolder};
use super::store::{MediaError, ObjectStore};

/// Caption used when a file name has no usable stem.
pub const DEFAULT_CAPTION: &str = "Foto da Galeria";

/// A file received from the admin panel.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub file_name: String,
    pub path: String,
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailure {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadReport {
    pub stored: Vec<StoredObject>,
    pub failed: Vec<UploadFailure>,
}

/// Caption derived from the file name without its extension.
pub fn caption_for(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    };
    let stem = stem.trim();
    if stem.is_empty() {
        DEFAULT_CAPTION.to_string()
    } else {
        stem.to_string()
    }
}

async fn store_at(
    store: &dyn ObjectStore,
    folder: &MediaFolder,
    upload: Upload,
    now: DateTime<Utc>,
    index: Option<usize>,
) -> Result<StoredObject, MediaError> {
    let path = object_path(folder, now.timestamp_millis(), index, &upload.file_name)?;
    if upload.bytes.is_empty() {
        return Err(MediaError::Empty(upload.file_name));
    }
    store.put(&path, upload.bytes, &upload.content_type).await?;
    let url = store.public_url(&path);
    Ok(StoredObject {
        caption: caption_for(&upload.file_name),
        file_name: upload.file_name,
        path,
        url,
    })
}

/// Upload a single file and return where it is served from.
pub async fn upload_one(
    store: &dyn ObjectStore,
    folder: &MediaFolder,
    upload: Upload,
    now: DateTime<Utc>,
) -> Result<StoredObject, MediaError> {
    store_at(store, folder, upload, now, None).await
}

/// Upload files one at a time. A failed file is logged and reported; the
/// remaining files are still uploaded and nothing is retried.
pub async fn upload_batch(
    store: &dyn ObjectStore,
    folder: &MediaFolder,
    uploads: Vec<Upload>,
    now: DateTime<Utc>,
) -> UploadReport {
    let batched = uploads.len() > 1;
    let mut report = UploadReport::default();

    for (index, upload) in uploads.into_iter().enumerate() {
        let file_name = upload.file_name.clone();
        let index = batched.then_some(index);
        match store_at(store, folder, upload, now, index).await {
            Ok(stored) => {
                tracing::info!(%folder, path = %stored.path, "upload stored");
                report.stored.push(stored);
            }
            Err(e) => {
                tracing::warn!(%folder, file = %file_name, error = %e, "upload failed, skipping");
                report.failed.push(UploadFailure {
                    file_name,
                    reason: e.to_string(),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::memory::MemoryObjectStore;

    fn image(name: &str) -> Upload {
        Upload {
            file_name: name.into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    fn at_millis(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn captions_use_file_stem() {
        assert_eq!(caption_for("Culto de Páscoa.jpg"), "Culto de Páscoa");
        assert_eq!(caption_for("foto.final.png"), "foto.final");
        assert_eq!(caption_for(".jpg"), DEFAULT_CAPTION);
    }

    #[tokio::test]
    async fn single_upload_returns_public_url() {
        let store = MemoryObjectStore::new("https://cdn.test/images");
        let stored = upload_one(&store, &MediaFolder::Pastor, image("pastor.jpg"), at_millis(1000))
            .await
            .unwrap();
        assert_eq!(stored.path, "pastor/1000.jpg");
        assert_eq!(stored.url, "https://cdn.test/images/pastor/1000.jpg");
        assert!(store.contains("pastor/1000.jpg").await);
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let store = MemoryObjectStore::new("https://cdn.test/images");
        let mut upload = image("vazio.jpg");
        upload.bytes.clear();
        let err = upload_one(&store, &MediaFolder::Hero, upload, at_millis(1)).await.unwrap_err();
        assert!(matches!(err, MediaError::Empty(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn batch_continues_past_failures() {
        let store = MemoryObjectStore::new("https://cdn.test/images").failing_on("-1.");
        let report = upload_batch(
            &store,
            &MediaFolder::Gallery,
            vec![image("a.jpg"), image("b.jpg"), image("c.txt"), image("d.png")],
            at_millis(5000),
        )
        .await;

        let stored: Vec<_> = report.stored.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(stored, vec!["gallery/5000-0.jpg", "gallery/5000-3.png"]);
        let failed: Vec<_> = report.failed.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(failed, vec!["b.jpg", "c.txt"]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn one_file_batch_has_no_index() {
        let store = MemoryObjectStore::new("https://cdn.test/images");
        let report = upload_batch(
            &store,
            &MediaFolder::Sermon("7".into()),
            vec![image("capa.jpg")],
            at_millis(42),
        )
        .await;
        assert_eq!(report.stored[0].path, "sermons/7/42.jpg");
        assert!(report.failed.is_empty());
    }
}
