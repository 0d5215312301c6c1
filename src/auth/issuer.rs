//! The session issuer seam.
//!
//! `SessionIssuer` is the one interface the actions and the route gate talk
//! to: sign in with credentials, sign out a token, or recover the session a
//! request carries. Production uses Redis-backed sessions; tests and local
//! development can swap in [`MemoryIssuer`] without touching any handler.

use crate::auth::password::verify_password;
use crate::auth::session::{extract_session_token, generate_session_token};
use crate::error::AppError;
use crate::models::{unix_now, Credentials, StoredSession, StoredUser};
use crate::storage::{self, UserStore};
use async_trait::async_trait;
use axum::http::HeaderMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Issues and recovers sessions.
///
/// Expiry policy is owned by the implementation: the Redis backend leans on
/// key TTLs, the in-memory fake never expires on its own.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Check credentials and mint a session bound to the matching user.
    ///
    /// Fails with [`AppError::Credentials`] on any mismatch: unknown email
    /// or wrong password look identical to the caller.
    async fn sign_in(&self, credentials: &Credentials) -> Result<StoredSession, AppError>;

    /// Destroy a session. Unknown tokens are not an error.
    async fn sign_out(&self, token: &str) -> Result<(), AppError>;

    /// Recover the session a request carries, or `None`.
    async fn current_session(&self, headers: &HeaderMap)
        -> Result<Option<StoredSession>, AppError>;
}

/// Shared credential check: both issuer implementations apply the same rule.
async fn authenticate(
    users: &dyn UserStore,
    credentials: &Credentials,
) -> Result<StoredUser, AppError> {
    let user = users
        .find_by_email(&credentials.email)
        .await?
        .ok_or(AppError::Credentials)?;

    if !verify_password(&credentials.password, &user.password_hash) {
        tracing::warn!(action = "auth_failed", email = %credentials.email, "Password mismatch");
        return Err(AppError::Credentials);
    }

    Ok(user)
}

fn new_session(user: &StoredUser) -> StoredSession {
    StoredSession {
        token: generate_session_token(),
        user_id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: unix_now(),
    }
}

/// Production issuer: sessions live in Redis under `session:{token}` and
/// expire via key TTL.
pub struct RedisIssuer {
    redis: redis::Client,
    users: Arc<dyn UserStore>,
    session_ttl_secs: u64,
}

impl RedisIssuer {
    pub fn new(redis: redis::Client, users: Arc<dyn UserStore>, session_ttl_secs: u64) -> Self {
        Self {
            redis,
            users,
            session_ttl_secs,
        }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))
    }
}

#[async_trait]
impl SessionIssuer for RedisIssuer {
    async fn sign_in(&self, credentials: &Credentials) -> Result<StoredSession, AppError> {
        let user = authenticate(self.users.as_ref(), credentials).await?;

        let session = new_session(&user);
        let mut con = self.connection().await?;
        storage::session::store_session(&mut con, &session, self.session_ttl_secs).await?;

        tracing::info!(action = "auth_success", user_id = %user.id, email = %user.email, "Session issued");
        Ok(session)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        let mut con = self.connection().await?;
        storage::session::delete_session(&mut con, token).await?;
        Ok(())
    }

    async fn current_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<StoredSession>, AppError> {
        let Some(token) = extract_session_token(headers) else {
            return Ok(None);
        };
        let mut con = self.connection().await?;
        Ok(storage::session::get_session(&mut con, &token).await?)
    }
}

/// In-memory issuer for tests and Redis-free local runs.
///
/// Sessions never expire by themselves; callers control lifetime through
/// `sign_out`.
pub struct MemoryIssuer {
    users: Arc<dyn UserStore>,
    sessions: Mutex<HashMap<String, StoredSession>>,
}

impl MemoryIssuer {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live sessions. Test hook.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl SessionIssuer for MemoryIssuer {
    async fn sign_in(&self, credentials: &Credentials) -> Result<StoredSession, AppError> {
        let user = authenticate(self.users.as_ref(), credentials).await?;
        let session = new_session(&user);
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
        Ok(())
    }

    async fn current_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<StoredSession>, AppError> {
        let Some(token) = extract_session_token(headers) else {
            return Ok(None);
        };
        Ok(self
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&token)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::auth::session::SESSION_COOKIE;
    use crate::models::NewUser;
    use crate::storage::memory::MemoryUserStore;
    use axum::http::{header::COOKIE, HeaderValue};

    async fn issuer_with_user(email: &str, password: &str) -> MemoryIssuer {
        let users = Arc::new(MemoryUserStore::new());
        users
            .create(NewUser {
                name: "Alice Smith".to_string(),
                email: email.to_string(),
                password_hash: hash_password(password).unwrap(),
            })
            .await
            .unwrap();
        MemoryIssuer::new(users)
    }

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_sign_in_binds_user_claims() {
        let issuer = issuer_with_user("a@x.com", "secret1").await;
        let session = issuer.sign_in(&creds("a@x.com", "secret1")).await.unwrap();
        assert_eq!(session.email, "a@x.com");
        assert_eq!(session.name, "Alice Smith");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let issuer = issuer_with_user("a@x.com", "secret1").await;
        let err = issuer
            .sign_in(&creds("a@x.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Credentials));
        assert_eq!(issuer.session_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email_indistinguishable() {
        let issuer = issuer_with_user("a@x.com", "secret1").await;
        let err = issuer
            .sign_in(&creds("nobody@x.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Credentials));
    }

    #[tokio::test]
    async fn test_current_session_roundtrip() {
        let issuer = issuer_with_user("a@x.com", "secret1").await;
        let session = issuer.sign_in(&creds("a@x.com", "secret1")).await.unwrap();

        let found = issuer
            .current_session(&cookie_headers(&session.token))
            .await
            .unwrap();
        assert_eq!(found.unwrap().user_id, session.user_id);

        // No cookie, no session
        let none = issuer.current_session(&HeaderMap::new()).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_destroys_session() {
        let issuer = issuer_with_user("a@x.com", "secret1").await;
        let session = issuer.sign_in(&creds("a@x.com", "secret1")).await.unwrap();

        issuer.sign_out(&session.token).await.unwrap();
        let found = issuer
            .current_session(&cookie_headers(&session.token))
            .await
            .unwrap();
        assert!(found.is_none());

        // Signing out an unknown token is fine
        issuer.sign_out("no-such-token").await.unwrap();
    }
}
