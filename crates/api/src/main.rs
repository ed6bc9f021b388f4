mod config;
mod error;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;

use church_site_core::auth::{hash_password, AdminGate, SessionKeys};
use church_site_core::content::ContentStore;
use church_site_core::events::EventBus;
use church_site_core::kv::FileKv;
use church_site_core::media::{MemoryObjectStore, ObjectStore, SupabaseStorage};
use church_site_core::messages::{MemoryInbox, MessageInbox, PgInbox};
use sqlx::postgres::PgPoolOptions;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

use config::{AdminCredential, AppConfig, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting church site API server");

    let inbox = connect_inbox(&config).await?;

    std::fs::create_dir_all(&config.content_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create content dir {}: {e}",
            config.content_dir.display()
        )
    })?;
    let content = ContentStore::load(FileKv::new(&config.content_dir));

    let media: Arc<dyn ObjectStore> = match &config.storage {
        StorageConfig::Supabase {
            url,
            service_key,
            bucket,
        } => {
            tracing::info!(%bucket, "Uploads go to Supabase storage");
            Arc::new(SupabaseStorage::new(url, bucket, service_key))
        }
        StorageConfig::Memory { public_base_url } => {
            tracing::warn!("SUPABASE_URL not set, uploads are kept in memory");
            Arc::new(MemoryObjectStore::new(public_base_url))
        }
    };

    let password_hash = match &config.admin_credential {
        AdminCredential::Hash(hash) => hash.clone(),
        AdminCredential::Plain(password) => {
            tracing::warn!("ADMIN_PASSWORD is plaintext; prefer ADMIN_PASSWORD_HASH");
            hash_password(password)
                .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?
        }
    };
    let admin = AdminGate::new(
        password_hash,
        SessionKeys::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::seconds(config.session_ttl_secs),
        ),
    );

    let event_bus = EventBus::new(config.event_bus_capacity);

    let state = state::AppState::new(content, inbox, media, admin, event_bus);

    let app = routes::build_router(state)
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer(&config.cors_origins));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Postgres-backed inbox when `DATABASE_URL` is set, in-memory otherwise.
async fn connect_inbox(config: &AppConfig) -> anyhow::Result<Arc<dyn MessageInbox>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, contact messages are kept in memory");
        return Ok(Arc::new(MemoryInbox::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;

    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgInbox::new(pool)))
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
