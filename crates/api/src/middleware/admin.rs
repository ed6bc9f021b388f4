use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use church_site_core::auth::SessionClaims;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for routes reserved to the admin panel. Requires a valid
/// `Authorization: Bearer <session token>` header.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionClaims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        state
            .admin()
            .authorize(bearer.token())
            .map(AdminSession)
            .map_err(|e| {
                tracing::debug!(error = %e, "admin session rejected");
                ApiError::Unauthorized
            })
    }
}
