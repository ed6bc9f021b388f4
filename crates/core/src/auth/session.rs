use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::password::verify_password;
use super::AuthError;

/// Subject recorded in admin session tokens.
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 signing keys plus the session lifetime.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<SessionToken, AuthError> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::Signing)?;
        Ok(SessionToken { token, expires_at })
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Server-side admin login: one password hash, stateless session tokens.
#[derive(Debug, Clone)]
pub struct AdminGate {
    password_hash: String,
    keys: SessionKeys,
}

impl AdminGate {
    pub fn new(password_hash: impl Into<String>, keys: SessionKeys) -> Self {
        Self {
            password_hash: password_hash.into(),
            keys,
        }
    }

    /// Check `password` and issue a session token. Argon2 verification runs on
    /// the blocking pool so it does not hold up the async workers.
    pub async fn login(&self, password: &str, now: DateTime<Utc>) -> Result<SessionToken, AuthError> {
        let password = password.to_owned();
        let password_hash = self.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| AuthError::Hashing(format!("password check did not complete: {e}")))??;

        if !verified {
            tracing::warn!("admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        tracing::info!("admin login accepted");
        self.keys.issue(ADMIN_SUBJECT, now)
    }

    pub fn authorize(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let claims = self.keys.verify(token)?;
        if claims.sub != ADMIN_SUBJECT {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn gate() -> AdminGate {
        AdminGate::new(
            hash_password("Villares07").unwrap(),
            SessionKeys::new(b"test-secret", Duration::hours(12)),
        )
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let gate = gate();
        let now = Utc::now();
        let session = gate.login("Villares07", now).await.unwrap();
        assert_eq!(session.expires_at, now + Duration::hours(12));

        let claims = gate.authorize(&session.token).unwrap();
        assert_eq!(claims.sub, ADMIN_SUBJECT);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        assert!(matches!(
            gate().login("villares07", Utc::now()).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn login_lets_other_tasks_run_while_verifying() {
        let gate = gate();
        let finished = AtomicBool::new(false);

        let (session, ran_during_login) = tokio::join!(
            async {
                let session = gate.login("Villares07", Utc::now()).await;
                finished.store(true, Ordering::SeqCst);
                session
            },
            async { !finished.load(Ordering::SeqCst) },
        );

        assert!(session.is_ok());
        assert!(ran_during_login);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let gate = gate();
        let session = gate
            .login("Villares07", Utc::now() - Duration::days(2))
            .await
            .unwrap();
        assert!(matches!(
            gate.authorize(&session.token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = SessionKeys::new(b"someone-else", Duration::hours(1))
            .issue(ADMIN_SUBJECT, Utc::now())
            .unwrap();
        assert!(matches!(
            gate().authorize(&other.token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn non_admin_subject_is_rejected() {
        let keys = SessionKeys::new(b"test-secret", Duration::hours(1));
        let token = keys.issue("visitor", Utc::now()).unwrap();
        let gate = AdminGate::new(hash_password("x").unwrap(), keys);
        assert!(matches!(
            gate.authorize(&token.token),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
