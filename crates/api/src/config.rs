use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} is required")]
    Missing(&'static str),
}

/// Where uploaded images go.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Supabase {
        url: String,
        service_key: String,
        bucket: String,
    },
    /// Keep uploads in memory, served under `public_base_url`. Development only.
    Memory { public_base_url: String },
}

/// How the admin password is configured.
#[derive(Debug, Clone)]
pub enum AdminCredential {
    /// Argon2 PHC string.
    Hash(String),
    /// Plaintext, hashed once at startup.
    Plain(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL; without it messages are kept in memory.
    pub database_url: Option<String>,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// Directory holding the persisted content document.
    pub content_dir: PathBuf,
    pub storage: StorageConfig,
    pub admin_credential: AdminCredential,
    /// Session token signing secret. Required: anyone who knows it can mint
    /// admin sessions.
    pub jwt_secret: String,
    pub session_ttl_secs: i64,
    /// Request body cap for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// Allowed CORS origins; empty means any.
    pub cors_origins: Vec<String>,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: FromStr>(
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = var_or(name, default);
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value,
    })
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    non_empty(name).ok_or(ConfigError::Missing(name))
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_SERVICE_KEY")) {
            (Some(url), Some(service_key)) => StorageConfig::Supabase {
                url,
                service_key,
                bucket: var_or("STORAGE_BUCKET", "images"),
            },
            (Some(_), None) => return Err(ConfigError::Missing("SUPABASE_SERVICE_KEY")),
            _ => StorageConfig::Memory {
                public_base_url: var_or("MEDIA_BASE_URL", "http://localhost:3030/media"),
            },
        };

        let admin_credential = match (non_empty("ADMIN_PASSWORD_HASH"), non_empty("ADMIN_PASSWORD")) {
            (Some(hash), _) => AdminCredential::Hash(hash),
            (None, Some(plain)) => AdminCredential::Plain(plain),
            (None, None) => return Err(ConfigError::Missing("ADMIN_PASSWORD_HASH")),
        };

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parsed("PORT", "3030", "u16")?,
            database_url: non_empty("DATABASE_URL"),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", "10", "u32")?,
            db_min_connections: parsed("DB_MIN_CONNECTIONS", "1", "u32")?,
            content_dir: PathBuf::from(var_or("CONTENT_DIR", "data")),
            storage,
            admin_credential,
            jwt_secret: required("JWT_SECRET")?,
            session_ttl_secs: parsed("SESSION_TTL_SECS", "43200", "i64")?,
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", "10485760", "usize")?,
            cors_origins: var_or("CORS_ORIGINS", "")
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            event_bus_capacity: parsed("EVENT_BUS_CAPACITY", "256", "usize")?,
            log_level: var_or("LOG_LEVEL", "info"),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration for router tests; nothing here touches the environment.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            db_max_connections: 1,
            db_min_connections: 0,
            content_dir: PathBuf::from("unused"),
            storage: StorageConfig::Memory {
                public_base_url: "https://cdn.test/images".into(),
            },
            admin_credential: AdminCredential::Plain("segredo".into()),
            jwt_secret: "test-secret".into(),
            session_ttl_secs: 3600,
            max_upload_bytes: 1024 * 1024,
            cors_origins: Vec::new(),
            event_bus_capacity: 16,
            log_level: "debug".into(),
        }
    }
}
