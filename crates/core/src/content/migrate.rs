//! Schema migrations for stored content documents.
//!
//! Migrations operate on the raw JSON object before it is reconciled with the
//! built-in document, because older documents may be missing sections or carry
//! fields that no longer decode.

use serde_json::{Map, Value};

use super::defaults::{CURRENT_VERSION, PLACEHOLDER_IMAGE_HOST};
use super::model::ContentDocument;
use super::sanitize::is_truthy;

pub type RawDocument = Map<String, Value>;

/// One numbered step. `apply` takes the document as it was before `version`
/// and returns it in the `version` shape.
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub apply: fn(RawDocument, &ContentDocument) -> RawDocument,
}

/// Ordered by ascending version; the last entry targets [`CURRENT_VERSION`].
pub static MIGRATIONS: &[Migration] = &[Migration {
    version: 60,
    name: "backfill_hero_media",
    apply: backfill_hero_media,
}];

/// Version recorded in a raw document; missing or malformed reads as 0.
pub fn stored_version(doc: &RawDocument) -> u64 {
    doc.get("version").and_then(Value::as_u64).unwrap_or(0)
}

/// Run every migration newer than the stored version and stamp the document
/// with the current version. Documents from a newer build keep their version.
pub fn migrate(mut doc: RawDocument, defaults: &ContentDocument) -> RawDocument {
    let from = stored_version(&doc);
    let target = u64::from(CURRENT_VERSION);

    if from > target {
        tracing::warn!(
            stored = from,
            current = target,
            "stored content is newer than this build; leaving version untouched"
        );
        return doc;
    }
    if from == target {
        return doc;
    }

    tracing::info!(from, to = target, "migrating stored content");
    for migration in MIGRATIONS
        .iter()
        .filter(|m| u64::from(m.version) > from)
    {
        tracing::debug!(version = migration.version, name = migration.name, "applying migration");
        doc = (migration.apply)(doc, defaults);
    }
    doc.insert("version".into(), Value::from(CURRENT_VERSION));
    doc
}

/// Version 60 introduced the hero video and replaced the stock-photo hero.
fn backfill_hero_media(mut doc: RawDocument, defaults: &ContentDocument) -> RawDocument {
    if !matches!(doc.get("general"), Some(Value::Object(_))) {
        doc.insert("general".into(), Value::Object(Map::new()));
    }

    if let Some(Value::Object(general)) = doc.get_mut("general") {
        if !is_truthy(general.get("heroVideo")) {
            let video = defaults.general.hero_video.clone().unwrap_or_default();
            general.insert("heroVideo".into(), Value::String(video));
        }

        let placeholder = match general.get("heroImage") {
            Some(Value::String(url)) => url.is_empty() || url.contains(PLACEHOLDER_IMAGE_HOST),
            other => !is_truthy(other),
        };
        if placeholder {
            if let Some(image) = &defaults.general.hero_image {
                general.insert("heroImage".into(), Value::String(image.clone()));
            }
        }
    }
    doc
}
