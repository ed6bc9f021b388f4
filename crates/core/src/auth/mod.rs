//! Admin credential and session tokens.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{AdminGate, SessionClaims, SessionKeys, SessionToken};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session token is invalid or expired")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
