use std::fmt;

use super::store::MediaError;

/// Image extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "heic", "gif"];

/// Where an upload belongs. Sermon and event images are grouped per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaFolder {
    Pastor,
    Hero,
    Gallery,
    Sermon(String),
    Event(String),
}

impl MediaFolder {
    /// Parse a folder name as used in upload routes, with the owning item id
    /// for per-item folders.
    pub fn parse(kind: &str, owner: Option<&str>) -> Result<Self, MediaError> {
        let owner_id = || -> Result<String, MediaError> {
            match owner.map(str::trim) {
                Some(id) if !id.is_empty() && !id.contains(['/', '\\']) && id != ".." => {
                    Ok(id.to_string())
                }
                _ => Err(MediaError::InvalidFolder(format!(
                    "{kind} uploads need a valid owner id"
                ))),
            }
        };
        match kind {
            "pastor" => Ok(MediaFolder::Pastor),
            "hero" => Ok(MediaFolder::Hero),
            "gallery" => Ok(MediaFolder::Gallery),
            "sermons" => Ok(MediaFolder::Sermon(owner_id()?)),
            "events" => Ok(MediaFolder::Event(owner_id()?)),
            other => Err(MediaError::InvalidFolder(format!("unknown folder {other:?}"))),
        }
    }
}

impl fmt::Display for MediaFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaFolder::Pastor => f.write_str("pastor"),
            MediaFolder::Hero => f.write_str("hero"),
            MediaFolder::Gallery => f.write_str("gallery"),
            MediaFolder::Sermon(id) => write!(f, "sermons/{id}"),
            MediaFolder::Event(id) => write!(f, "events/{id}"),
        }
    }
}

/// Lower-cased extension of `file_name`, if it is an accepted image type.
pub fn image_extension(file_name: &str) -> Result<String, MediaError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(MediaError::UnsupportedType(file_name.to_string()))
    }
}

/// Object name for an upload: `<folder>/<millis>.<ext>`, or
/// `<folder>/<millis>-<index>.<ext>` inside a batch.
pub fn object_path(
    folder: &MediaFolder,
    timestamp_ms: i64,
    index: Option<usize>,
    file_name: &str,
) -> Result<String, MediaError> {
    let ext = image_extension(file_name)?;
    Ok(match index {
        Some(i) => format!("{folder}/{timestamp_ms}-{i}.{ext}"),
        None => format!("{folder}/{timestamp_ms}.{ext}"),
    })
}
