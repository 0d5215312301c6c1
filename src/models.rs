//! User and session records.
//!
//! All models use serde for serialization/deserialization.
//! Storage models represent the records persisted in Redis.

use serde::{Deserialize, Serialize};

/// User data as stored.
///
/// `password_hash` is an Argon2 PHC string; the plaintext is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: u64,
}

/// Input to [`crate::storage::UserStore::create`].
///
/// The store generates the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Session data as stored.
///
/// Carries only the identity claims the dashboard renders: user id, name,
/// and email. Nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub created_at: u64,
}

/// Plaintext credentials presented to the session issuer.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@x.com"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret1"));
    }

    #[test]
    fn test_stored_user_roundtrip() {
        let user = StoredUser {
            id: "abc123".to_string(),
            name: "Alice Smith".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: 1_700_000_000,
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: StoredUser = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.email, user.email);
        assert_eq!(back.password_hash, user.password_hash);
    }
}
