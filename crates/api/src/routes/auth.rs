use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use church_site_core::auth::SessionToken;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

/// Admin session routes. Logging out is dropping the token client-side.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/session", get(session))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    subject: String,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<SessionToken>> {
    let token = state.admin().login(&request.password, Utc::now()).await?;
    Ok(Json(token))
}

async fn session(AdminSession(claims): AdminSession) -> Json<SessionInfo> {
    Json(SessionInfo {
        subject: claims.sub,
        issued_at: DateTime::from_timestamp(claims.iat, 0),
        expires_at: DateTime::from_timestamp(claims.exp, 0),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::build_router;
    use crate::routes::test_http::send;
    use crate::state::test_support;

    #[tokio::test]
    async fn login_issues_a_usable_token() {
        let app = build_router(test_support::state());

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/auth/login",
            Some(json!({ "password": test_support::ADMIN_PASSWORD })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();
        assert!(body["expiresAt"].is_string());

        let (status, body) =
            send(&app, Method::GET, "/v1/auth/session", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"], "admin");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = build_router(test_support::state());
        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/auth/login",
            Some(json!({ "password": "errada" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["statusCode"], 401);
    }

    #[tokio::test]
    async fn session_without_token_is_unauthorized() {
        let app = build_router(test_support::state());
        let (status, _) = send(&app, Method::GET, "/v1/auth/session", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
