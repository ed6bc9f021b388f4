use std::sync::Arc;

use church_site_core::auth::AdminGate;
use church_site_core::content::ContentStore;
use church_site_core::events::EventBus;
use church_site_core::media::ObjectStore;
use church_site_core::messages::MessageInbox;
use tokio::sync::RwLock;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    content: RwLock<ContentStore>,
    inbox: Arc<dyn MessageInbox>,
    media: Arc<dyn ObjectStore>,
    admin: AdminGate,
    event_bus: EventBus,
}

impl AppState {
    pub fn new(
        content: ContentStore,
        inbox: Arc<dyn MessageInbox>,
        media: Arc<dyn ObjectStore>,
        admin: AdminGate,
        event_bus: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(InnerState {
                content: RwLock::new(content),
                inbox,
                media,
                admin,
                event_bus,
            }),
        }
    }

    /// The content store has a single writer; handlers take the write lock
    /// for `update`/`reset` and the read lock for everything else.
    pub fn content(&self) -> &RwLock<ContentStore> {
        &self.inner.content
    }

    pub fn inbox(&self) -> &dyn MessageInbox {
        self.inner.inbox.as_ref()
    }

    pub fn media(&self) -> &dyn ObjectStore {
        self.inner.media.as_ref()
    }

    pub fn admin(&self) -> &AdminGate {
        &self.inner.admin
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}
