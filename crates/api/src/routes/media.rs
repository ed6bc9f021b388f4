use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use church_site_core::media::{upload_batch, MediaError, MediaFolder, Upload, UploadReport};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

/// Image routes. Uploads are capped by the server-wide request limit layer;
/// `/media/...` serves stored objects, which is where in-memory uploads'
/// public URLs point.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/media/{folder}", post(upload))
        .route("/v1/media", delete(remove))
        .layer(DefaultBodyLimit::disable())
        .route("/media/{*path}", get(serve))
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    owner: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoveQuery {
    url: String,
}

/// Store every file part of a multipart body under `folder`. Files that fail
/// are listed in the report; the rest are kept.
async fn upload(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(folder): Path<String>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadReport>> {
    let folder = MediaFolder::parse(&folder, query.owner.as_deref())?;

    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read {file_name}: {e}")))?;
        uploads.push(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if uploads.is_empty() {
        return Err(ApiError::BadRequest("no files in upload".into()));
    }

    let report = upload_batch(state.media(), &folder, uploads, Utc::now()).await;
    tracing::info!(
        %folder,
        stored = report.stored.len(),
        failed = report.failed.len(),
        "upload finished"
    );
    Ok(Json(report))
}

async fn serve(State(state): State<AppState>, Path(path): Path<String>) -> ApiResult<Response> {
    if path.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(ApiError::NotFound(format!("media {path}")));
    }
    let object = state
        .media()
        .get(&path)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("media {path}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        object.bytes,
    )
        .into_response())
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<RemoveQuery>,
) -> ApiResult<StatusCode> {
    let path = state
        .media()
        .path_from_public_url(&query.url)
        .ok_or_else(|| MediaError::ForeignUrl(query.url.clone()))?;
    state.media().delete(&path).await?;
    tracing::info!(%path, "media deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::routes::build_router;
    use crate::routes::test_http::send;
    use crate::state::test_support;

    const BOUNDARY: &str = "igreja-boundary";

    fn multipart_body(files: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    async fn post_files(
        app: &Router,
        uri: &str,
        token: Option<&str>,
        files: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::from(multipart_body(files))).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn upload_requires_admin() {
        let app = build_router(test_support::state());
        let (status, _) = post_files(&app, "/v1/media/gallery", None, &[("a.jpg", "x")]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn single_upload_has_no_index() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;
        let app = build_router(state);

        let (status, body) =
            post_files(&app, "/v1/media/pastor", Some(&token), &[("Pastor.PNG", "img")]).await;
        assert_eq!(status, StatusCode::OK);
        let path = body["stored"][0]["path"].as_str().unwrap();
        assert!(path.starts_with("pastor/"));
        assert!(path.ends_with(".png"));
        assert!(!path.contains('-'));
        assert_eq!(
            body["stored"][0]["url"],
            format!("https://cdn.test/images/{path}")
        );
    }

    #[tokio::test]
    async fn batch_keeps_going_past_bad_files() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;
        let app = build_router(state);

        let (status, body) = post_files(
            &app,
            "/v1/media/gallery",
            Some(&token),
            &[("culto.jpg", "a"), ("notas.txt", "b"), ("batismo.webp", "c")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stored"].as_array().unwrap().len(), 2);
        assert_eq!(body["stored"][0]["caption"], "culto");
        assert!(body["stored"][1]["path"].as_str().unwrap().contains("-2.webp"));
        assert_eq!(body["failed"][0]["fileName"], "notas.txt");
    }

    #[tokio::test]
    async fn per_item_folders_need_an_owner() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;
        let app = build_router(state);

        let (status, _) =
            post_files(&app, "/v1/media/sermons", Some(&token), &[("a.jpg", "x")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post_files(
            &app,
            "/v1/media/sermons?owner=s1",
            Some(&token),
            &[("a.jpg", "x")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["stored"][0]["path"]
            .as_str()
            .unwrap()
            .starts_with("sermons/s1/"));
    }

    #[tokio::test]
    async fn uploaded_image_is_served_back() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;
        let app = build_router(state);

        let (_, body) =
            post_files(&app, "/v1/media/gallery", Some(&token), &[("culto.jpg", "jpeg-bytes")]).await;
        let path = body["stored"][0]["path"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/media/{path}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"jpeg-bytes");

        let (status, body) = send(&app, Method::GET, "/media/gallery/missing.jpg", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "notFound");
    }

    #[tokio::test]
    async fn delete_by_public_url() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;
        let app = build_router(state);

        let (_, body) =
            post_files(&app, "/v1/media/hero", Some(&token), &[("leao.jpg", "x")]).await;
        let url = body["stored"][0]["url"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/v1/media?url={url}"),
            None,
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &app,
            Method::DELETE,
            "/v1/media?url=https://elsewhere.test/x.jpg",
            None,
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "badRequest");
    }
}
