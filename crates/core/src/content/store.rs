use crate::kv::KvBackend;

use super::defaults::{builtin, STORAGE_KEY};
use super::error::ContentError;
use super::merge::reconcile;
use super::model::ContentDocument;
use super::patch::ContentPatch;

/// Single owner of the site content document.
///
/// Holds the in-memory document and mirrors every change to the backend.
/// Callers that share a store across tasks wrap it in a lock; the store
/// itself has one reader/writer.
pub struct ContentStore {
    backend: Box<dyn KvBackend>,
    key: String,
    defaults: ContentDocument,
    current: ContentDocument,
}

impl ContentStore {
    /// Load the document persisted under the standard key.
    pub fn load(backend: impl KvBackend + 'static) -> Self {
        Self::load_with(Box::new(backend), STORAGE_KEY, builtin())
    }

    /// Load with an explicit key and built-in document.
    ///
    /// Never fails: a missing, unreadable or corrupt document degrades to the
    /// built-in one.
    pub fn load_with(
        backend: Box<dyn KvBackend>,
        key: impl Into<String>,
        defaults: ContentDocument,
    ) -> Self {
        let key = key.into();
        let current = match backend.get(&key) {
            Ok(Some(bytes)) => match reconcile(&bytes, &defaults) {
                Ok(doc) => {
                    tracing::info!(%key, version = doc.version, "loaded stored content");
                    doc
                }
                Err(e) => {
                    tracing::error!(%key, error = %e, "failed to parse saved content, using defaults");
                    defaults.clone()
                }
            },
            Ok(None) => {
                tracing::info!(%key, "no stored content, using defaults");
                defaults.clone()
            }
            Err(e) => {
                tracing::error!(%key, error = %e, "failed to read saved content, using defaults");
                defaults.clone()
            }
        };

        Self {
            backend,
            key,
            defaults,
            current,
        }
    }

    pub fn document(&self) -> &ContentDocument {
        &self.current
    }

    /// Merge `patch` onto the current document and persist the result.
    ///
    /// The in-memory document is only replaced after the backend write
    /// succeeds; on error it is left exactly as it was.
    pub fn update(&mut self, patch: ContentPatch) -> Result<&ContentDocument, ContentError> {
        let sections = patch.sections();
        let mut next = self.current.clone();
        patch.apply_to(&mut next);

        let serialized = serde_json::to_vec(&next).map_err(ContentError::Encode)?;
        if let Err(e) = self.backend.put(&self.key, &serialized) {
            tracing::error!(key = %self.key, error = %e, "failed to save content");
            return Err(e.into());
        }

        self.current = next;
        tracing::info!(
            key = %self.key,
            sections = ?sections,
            bytes = serialized.len(),
            "content saved"
        );
        Ok(&self.current)
    }

    /// Drop the persisted document and go back to the built-in one.
    ///
    /// Backend errors are logged, not returned; the in-memory document is
    /// reset either way.
    pub fn reset(&mut self) -> &ContentDocument {
        if let Err(e) = self.backend.remove(&self.key) {
            tracing::error!(key = %self.key, error = %e, "failed to remove saved content");
        }
        self.current = self.defaults.clone();
        tracing::info!(key = %self.key, "content reset to defaults");
        &self.current
    }

    /// Give the backend back, e.g. to reload from it.
    pub fn into_backend(self) -> Box<dyn KvBackend> {
        self.backend
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("key", &self.key)
            .field("version", &self.current.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::defaults::CURRENT_VERSION;
    use crate::content::model::{PixKeyType, Sermon};
    use crate::kv::{KvError, MemoryKv};
    use serde_json::json;
    use std::collections::HashSet;

    /// Backend whose reads and writes always fail.
    struct BrokenKv;

    impl KvBackend for BrokenKv {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KvError> {
            Err(KvError::Io(std::io::Error::other("disk on fire")))
        }

        fn put(&mut self, _key: &str, _value: &[u8]) -> Result<(), KvError> {
            Err(KvError::Io(std::io::Error::other("disk on fire")))
        }

        fn remove(&mut self, _key: &str) -> Result<(), KvError> {
            Err(KvError::Io(std::io::Error::other("disk on fire")))
        }
    }

    fn stored(value: serde_json::Value) -> MemoryKv {
        MemoryKv::new().with_entry(STORAGE_KEY, value.to_string())
    }

    fn reload(store: ContentStore) -> ContentStore {
        ContentStore::load_with(store.into_backend(), STORAGE_KEY, builtin())
    }

    fn sermon(id: &str, title: &str) -> Sermon {
        Sermon {
            id: id.into(),
            title: title.into(),
            preacher: "Pr. Wellington Vilares".into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_storage_yields_defaults() {
        let store = ContentStore::load(MemoryKv::new());
        assert_eq!(store.document(), &builtin());
    }

    #[test]
    fn malformed_bytes_yield_defaults() {
        let store = ContentStore::load(MemoryKv::new().with_entry(STORAGE_KEY, "{{{ not json"));
        assert_eq!(store.document(), &builtin());

        let store = ContentStore::load(stored(json!("a string")));
        assert_eq!(store.document(), &builtin());
    }

    #[test]
    fn unreadable_backend_yields_defaults() {
        let store = ContentStore::load(BrokenKv);
        assert_eq!(store.document(), &builtin());
    }

    #[test]
    fn old_version_is_upgraded_with_hero_backfill() {
        let store = ContentStore::load(stored(json!({
            "version": 3,
            "general": {
                "churchName": "Igreja Local",
                "heroImage": "https://images.unsplash.com/photo-1614027164847"
            }
        })));
        let doc = store.document();
        assert_eq!(doc.version, CURRENT_VERSION);
        assert_eq!(doc.general.church_name, "Igreja Local");
        assert_eq!(doc.general.hero_image, builtin().general.hero_image);
        assert_eq!(doc.general.hero_video.as_deref(), Some(""));
    }

    #[test]
    fn old_version_keeps_custom_hero() {
        let store = ContentStore::load(stored(json!({
            "version": 59,
            "general": { "heroImage": "https://cdn.example/lion.png" }
        })));
        assert_eq!(
            store.document().general.hero_image.as_deref(),
            Some("https://cdn.example/lion.png")
        );
    }

    #[test]
    fn stored_sermons_get_string_ids() {
        let store = ContentStore::load(stored(json!({
            "version": CURRENT_VERSION,
            "sermons": [{ "id": 10, "title": "a" }, { "title": "b" }, { "title": "c" }, 5]
        })));
        let sermons = &store.document().sermons;
        assert_eq!(sermons.len(), 3);
        assert_eq!(sermons[0].id, "10");
        let ids: HashSet<_> = sermons.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }

    /// A document as the site's admin panel writes it: the compiled-in data
    /// of an older release plus dashboard edits, with the panel's enum labels,
    /// optional keys set to null, extra keys and a number where text is expected.
    fn site_written_document() -> serde_json::Value {
        json!({
            "version": 60,
            "general": {
                "churchName": "Ministério Pleno Avivamento",
                "pastorName": "Ev. Wellington Villares",
                "pastorImage": "https://i.imgur.com/9239bd33.jpg",
                "heroImage": "https://cdn.example/hero/leao.jpg",
                "heroVideo": "https://cdn.example/hero/culto.mp4",
                "backgroundAudioUrl": null,
                "welcomeMessage": "Avivando Vidas, Transformando Destinos",
                "verse": "Ouvi, Senhor, a tua palavra, e temi",
                "verseReference": "Habacuque 3:2"
            },
            "contact": {
                "address": "Rua do Avivamento, 777 - Centro",
                "cityState": "Bauru - SP",
                "whatsapp": "(14) 99777-1234",
                "email": "contato@avivamentopleno.com.br",
                "phone": "(14) 3222-0000"
            },
            "social": {
                "instagram": "https://instagram.com/plenoavivamento",
                "facebook": "https://facebook.com/plenoavivamento",
                "youtube": "https://youtube.com/@plenoavivamento"
            },
            "bank": {
                "bank": "Banco do Brasil (001)",
                "agency": "1234-5",
                "account": "99999-X",
                "favored": "Min. Pleno Avivamento",
                "cnpj": "00.000.000/0001-00",
                "pixKey": "123.456.789-00",
                "pixKeyType": "CPF",
                "pixCode": "00020126580014BR.GOV.BCB.PIX0114123456789005204"
            },
            "history": "<p>nossa história</p>",
            "multimedia": {
                "liveUrl": "https://youtube.com/live/abc",
                "isLiveNow": false,
                "liveTitle": "Culto de Sábado - Ao Vivo",
                "podcastUrl": "https://spotify.com",
                "latestPodcasts": [{ "id": "1", "title": "Caminhando em Santidade #12" }]
            },
            "sermons": [
                {
                    "id": "1",
                    "title": "O Poder da Perseverança",
                    "preacher": "Pr. Wellington Vilares",
                    "date": "10 Set 2023",
                    "thumbnail": "https://picsum.photos/id/231/600/400",
                    "duration": "45:20"
                },
                {
                    "id": 1717171717171u64,
                    "title": "Avivamento Genuíno",
                    "preacher": "Pr. Wellington Vilares",
                    "date": "03 Set 2023",
                    "thumbnail": "https://picsum.photos/id/232/600/400",
                    "duration": 52,
                    "videoUrl": "https://youtu.be/avivamento"
                }
            ],
            "services": [
                { "id": "s1", "day": "Sábado", "time": "19:30", "name": "Culto de Avivamento" }
            ],
            "events": [
                {
                    "id": "e1",
                    "title": "Vigília",
                    "date": "2024-03-15",
                    "time": "22:00",
                    "image": "https://cdn.example/events/vigilia.jpg",
                    "description": "Noite de oração",
                    "tag": null
                }
            ],
            "gallery": [
                { "id": "g1", "url": "https://cdn.example/gallery/1.jpg", "alt": "Batismo" }
            ]
        })
    }

    #[test]
    fn site_written_document_keeps_every_stored_leaf() {
        let store = ContentStore::load(stored(site_written_document()));
        let doc = store.document();

        assert_eq!(doc.history, "<p>nossa história</p>");
        assert_eq!(doc.general.hero_image.as_deref(), Some("https://cdn.example/hero/leao.jpg"));
        assert_eq!(doc.general.hero_video.as_deref(), Some("https://cdn.example/hero/culto.mp4"));
        assert_eq!(doc.general.background_audio_url, None);
        assert_eq!(doc.contact.whatsapp, "(14) 99777-1234");
        assert_eq!(doc.contact.phone, "(14) 3222-0000");
        assert_eq!(doc.contact.map_url, None);
        assert_eq!(doc.social.youtube, "https://youtube.com/@plenoavivamento");
        assert_eq!(doc.bank.pix_key_type, PixKeyType::Cpf);
        assert_eq!(doc.bank.pix_key, "123.456.789-00");
        assert_eq!(doc.bank.payment_payload(), "00020126580014BR.GOV.BCB.PIX0114123456789005204");
        assert_eq!(doc.multimedia.live_url, "https://youtube.com/live/abc");
        assert!(!doc.multimedia.is_live_now);
        assert_eq!(doc.multimedia.live_title, "Culto de Sábado - Ao Vivo");

        assert_eq!(doc.sermons.len(), 2);
        assert_eq!(doc.sermons[0].duration, "45:20");
        assert_eq!(doc.sermons[0].video_url, "");
        assert_eq!(doc.sermons[1].id, "1717171717171");
        assert_eq!(doc.sermons[1].title, "Avivamento Genuíno");
        assert_eq!(doc.sermons[1].duration, "");
        assert_eq!(doc.sermons[1].video_url, "https://youtu.be/avivamento");

        assert_eq!(doc.main_service().map(|s| s.name.as_str()), Some("Culto de Avivamento"));
        assert_eq!(doc.events[0].tag, None);
        assert_eq!(doc.events[0].description, "Noite de oração");
        assert_eq!(doc.gallery[0].alt, "Batismo");
    }

    #[test]
    fn editing_a_site_written_document_keeps_its_data() {
        let mut store = ContentStore::load(stored(site_written_document()));
        store
            .update(ContentPatch::from_value(json!({ "social": {
                "instagram": "https://instagram.com/novo",
                "facebook": "https://facebook.com/plenoavivamento",
                "youtube": "https://youtube.com/@plenoavivamento"
            }})).unwrap())
            .unwrap();

        let store = reload(store);
        let doc = store.document();
        assert_eq!(doc.social.instagram, "https://instagram.com/novo");
        assert_eq!(doc.history, "<p>nossa história</p>");
        assert_eq!(doc.bank.pix_key_type, PixKeyType::Cpf);
        assert_eq!(doc.sermons[1].title, "Avivamento Genuíno");
    }

    #[test]
    fn update_persists_and_survives_reload() {
        let mut store = ContentStore::load(MemoryKv::new());
        let sermons = vec![sermon("a1", "Fé que Move"), sermon("b2", "Graça")];

        store
            .update(ContentPatch {
                sermons: Some(sermons.clone()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.document().sermons, sermons);

        let store = reload(store);
        assert_eq!(store.document().sermons, sermons);
        assert_eq!(store.document().general, builtin().general);
    }

    #[test]
    fn update_assigns_missing_ids() {
        let mut store = ContentStore::load(MemoryKv::new());
        let doc = store
            .update(ContentPatch {
                sermons: Some(vec![sermon("", "sem id"), sermon("", "outro")]),
                ..Default::default()
            })
            .unwrap();
        assert!(doc.sermons.iter().all(|s| !s.id.is_empty()));
        assert_ne!(doc.sermons[0].id, doc.sermons[1].id);

        let expected = doc.sermons.clone();
        let store = reload(store);
        assert_eq!(store.document().sermons, expected);
    }

    #[test]
    fn failed_write_leaves_document_unchanged() {
        let mut store = ContentStore::load(MemoryKv::with_quota(64));
        let before = store.document().clone();

        let err = store
            .update(ContentPatch {
                history: Some("<p>história nova</p>".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ContentError::Persist(KvError::QuotaExceeded { .. })
        ));
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn failed_write_on_broken_backend() {
        let mut store = ContentStore::load(BrokenKv);
        let result = store.update(ContentPatch {
            history: Some("x".into()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(store.document(), &builtin());
    }

    #[test]
    fn reset_restores_defaults_and_clears_storage() {
        let mut store = ContentStore::load(MemoryKv::new());
        store
            .update(ContentPatch {
                history: Some("custom".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(store.reset(), &builtin());
        let store = reload(store);
        assert_eq!(store.document(), &builtin());
    }

    #[test]
    fn reset_swallows_backend_errors() {
        let mut store = ContentStore::load(BrokenKv);
        assert_eq!(store.reset(), &builtin());
    }
}
