use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, Sse},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use church_site_core::events::{MessageReceivedEvent, SiteEvent};
use church_site_core::messages::{ContactMessage, NewContactMessage};
use futures::Stream;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::routes::sse::event_stream;
use crate::state::AppState;

/// Contact-form inbox routes. Submitting is public; the rest is admin-only.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/messages", post(submit).get(list))
        .route("/v1/messages/listen", get(listen))
        .route("/v1/messages/{id}", axum::routing::patch(set_read).delete(remove))
        .route("/v1/messages/{id}/toggle-read", post(toggle_read))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadState {
    is_read: bool,
}

async fn submit(
    State(state): State<AppState>,
    Json(message): Json<NewContactMessage>,
) -> ApiResult<(StatusCode, Json<ContactMessage>)> {
    let stored = state.inbox().submit(message).await?;
    tracing::info!(id = %stored.id, category = %stored.category, "contact message received");

    state
        .event_bus()
        .publish(SiteEvent::MessageReceived(MessageReceivedEvent {
            id: stored.id,
            category: stored.category,
            timestamp: Utc::now(),
        }));

    Ok((StatusCode::CREATED, Json(stored)))
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> ApiResult<Json<Vec<ContactMessage>>> {
    Ok(Json(state.inbox().list().await?))
}

/// Admin event stream: everything on the bus, inbox arrivals included.
async fn listen(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    event_stream(state.event_bus(), |_| true)
}

async fn set_read(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(body): Json<ReadState>,
) -> ApiResult<Json<ContactMessage>> {
    Ok(Json(state.inbox().set_read(id, body.is_read).await?))
}

async fn toggle_read(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ContactMessage>> {
    Ok(Json(state.inbox().toggle_read(id).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.inbox().delete(id).await?;
    tracing::info!(%id, "contact message deleted");
    Ok(StatusCode::NO_CONTENT)
}
