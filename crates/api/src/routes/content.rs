use axum::{
    extract::State,
    response::sse::{Event, Sse},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use church_site_core::content::{ContentDocument, ContentPatch};
use church_site_core::events::{ContentUpdatedEvent, SiteEvent};
use futures::Stream;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::middleware::admin::AdminSession;
use crate::routes::sse::event_stream;
use crate::state::AppState;

/// Site content routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/content", get(get_content).patch(update_content))
        .route("/v1/content/reset", post(reset_content))
        .route("/v1/content/listen", get(listen))
}

async fn get_content(State(state): State<AppState>) -> Json<ContentDocument> {
    Json(state.content().read().await.document().clone())
}

/// Replace one or more top-level sections and persist the result.
async fn update_content(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(body): Json<Value>,
) -> ApiResult<Json<ContentDocument>> {
    let patch = ContentPatch::from_value(body)?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest("patch does not touch any section".into()));
    }
    let sections: Vec<String> = patch.sections().into_iter().map(String::from).collect();

    let doc = {
        let mut store = state.content().write().await;
        store.update(patch)?.clone()
    };

    state
        .event_bus()
        .publish(SiteEvent::ContentUpdated(ContentUpdatedEvent {
            version: doc.version,
            sections,
            timestamp: Utc::now(),
        }));

    Ok(Json(doc))
}

async fn reset_content(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Json<ContentDocument> {
    let doc = state.content().write().await.reset().clone();
    state.event_bus().publish(SiteEvent::ContentReset {
        timestamp: Utc::now(),
    });
    Json(doc)
}

/// Public event stream. Inbox events are left out.
async fn listen(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    event_stream(state.event_bus(), SiteEvent::is_public)
}
