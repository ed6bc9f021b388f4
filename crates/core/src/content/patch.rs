use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ContentError;
use super::merge::json_kind;
use super::model::{
    BankInfo, ContactInfo, ContentDocument, Event, GalleryImage, GeneralInfo, MultimediaConfig,
    Sermon, Service, SocialLinks,
};
use super::sanitize::{ensure_unique_ids, sanitize_lists};

/// Replacement values for any subset of the document's top-level keys.
///
/// Sections are replaced whole; `version` is owned by the store and cannot be
/// patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<GeneralInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sermons: Option<Vec<Sermon>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<GalleryImage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multimedia: Option<MultimediaConfig>,
}

impl ContentPatch {
    /// Parse a patch from raw JSON, sanitising list entries the same way
    /// stored documents are sanitised on load.
    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return Err(ContentError::NotAnObject(json_kind(&other))),
        };
        sanitize_lists(&mut fields);
        serde_json::from_value(Value::Object(fields)).map_err(ContentError::Decode)
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }

    /// Top-level keys this patch replaces.
    pub fn sections(&self) -> Vec<&'static str> {
        [
            ("general", self.general.is_some()),
            ("contact", self.contact.is_some()),
            ("social", self.social.is_some()),
            ("bank", self.bank.is_some()),
            ("history", self.history.is_some()),
            ("sermons", self.sermons.is_some()),
            ("services", self.services.is_some()),
            ("events", self.events.is_some()),
            ("gallery", self.gallery.is_some()),
            ("multimedia", self.multimedia.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    /// Shallow-merge onto `doc`.
    pub fn apply_to(self, doc: &mut ContentDocument) {
        if let Some(general) = self.general {
            doc.general = general;
        }
        if let Some(contact) = self.contact {
            doc.contact = contact;
        }
        if let Some(social) = self.social {
            doc.social = social;
        }
        if let Some(bank) = self.bank {
            doc.bank = bank;
        }
        if let Some(history) = self.history {
            doc.history = history;
        }
        if let Some(mut sermons) = self.sermons {
            ensure_unique_ids(&mut sermons);
            doc.sermons = sermons;
        }
        if let Some(mut services) = self.services {
            ensure_unique_ids(&mut services);
            doc.services = services;
        }
        if let Some(mut events) = self.events {
            ensure_unique_ids(&mut events);
            doc.events = events;
        }
        if let Some(mut gallery) = self.gallery {
            ensure_unique_ids(&mut gallery);
            doc.gallery = gallery;
        }
        if let Some(multimedia) = self.multimedia {
            doc.multimedia = multimedia;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::defaults::builtin;
    use serde_json::json;

    #[test]
    fn version_is_not_patchable() {
        let patch = ContentPatch::from_value(json!({ "version": 1, "history": "x" })).unwrap();
        let mut doc = builtin();
        patch.apply_to(&mut doc);
        assert_eq!(doc.version, builtin().version);
        assert_eq!(doc.history, "x");
    }

    #[test]
    fn sections_lists_present_keys() {
        let patch = ContentPatch::from_value(json!({
            "gallery": [],
            "bank": { "pixKey": "chave" }
        }))
        .unwrap();
        assert_eq!(patch.sections(), vec!["bank", "gallery"]);
        assert!(!patch.is_empty());
        assert!(ContentPatch::default().is_empty());
    }

    #[test]
    fn raw_lists_are_sanitised() {
        let patch = ContentPatch::from_value(json!({
            "services": [{ "day": "Domingo" }, "junk", { "id": 5, "day": "Sábado" }]
        }))
        .unwrap();
        let services = patch.services.unwrap();
        assert_eq!(services.len(), 2);
        assert!(!services[0].id.is_empty());
        assert_eq!(services[1].id, "5");
    }

    #[test]
    fn untouched_sections_survive() {
        let mut doc = builtin();
        ContentPatch {
            history: Some("<p>x</p>".into()),
            ..Default::default()
        }
        .apply_to(&mut doc);
        assert_eq!(doc.sermons, builtin().sermons);
        assert_eq!(doc.general, builtin().general);
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(
            ContentPatch::from_value(json!([1])),
            Err(ContentError::NotAnObject(_))
        ));
    }
}
