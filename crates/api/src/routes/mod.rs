pub mod auth;
pub mod content;
pub mod health;
pub mod media;
pub mod messages;
pub mod sse;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(content::routes())
        .merge(auth::routes())
        .merge(messages::routes())
        .merge(media::routes())
        .with_state(state)
}
