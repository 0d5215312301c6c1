//! User Redis operations.
//!
//! Redis key patterns:
//! - `user:{nanoid}` — individual user data (JSON)
//! - `email:{email}` — email lookup to user_id (STRING)
//!
//! Uniqueness is enforced at the store: `create` claims the email key with
//! `SET NX` before writing the user record, so a concurrent duplicate
//! insert loses the race here rather than in application code.
//!
//! User JSON is wrapped in `Zeroizing` so password digests are cleared from
//! this process's memory after deserialization.

use crate::error::AppError;
use crate::models::{unix_now, NewUser, StoredUser};
use crate::storage::UserStore;
use async_trait::async_trait;
use redis::AsyncCommands;
use zeroize::Zeroizing;

/// Store a user record. The email key must already be claimed.
pub async fn store_user<C>(con: &mut C, user: &StoredUser) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let user_key = format!("user:{}", user.id);
    let json = serde_json::to_string(user).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON serialize",
            e.to_string(),
        ))
    })?;

    con.set::<_, _, ()>(&user_key, json).await?;
    Ok(())
}

/// Claim `email:{email}` for a user id. Returns false when the email is
/// already taken.
pub async fn claim_email<C>(con: &mut C, email: &str, id: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let email_key = format!("email:{}", email);
    con.set_nx(&email_key, id).await
}

/// Get a user by ID.
pub async fn get_user<C>(con: &mut C, id: &str) -> Result<Option<StoredUser>, AppError>
where
    C: AsyncCommands,
{
    let key = format!("user:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            let user = serde_json::from_str(&zeroizing_data)?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Get a user by email.
///
/// Performs a two-step lookup: email -> user_id -> user data.
pub async fn get_user_by_email<C>(con: &mut C, email: &str) -> Result<Option<StoredUser>, AppError>
where
    C: AsyncCommands,
{
    let email_key = format!("email:{}", email);
    let user_id: Option<String> = con.get(&email_key).await?;

    match user_id {
        Some(id) => get_user(con, &id).await,
        None => Ok(None),
    }
}

/// Redis-backed [`UserStore`].
pub struct RedisUserStore {
    redis: redis::Client,
}

impl RedisUserStore {
    pub fn new(redis: redis::Client) -> Self {
        Self { redis }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AppError> {
        let mut con = self.connection().await?;
        get_user_by_email(&mut con, email).await
    }

    async fn create(&self, new_user: NewUser) -> Result<StoredUser, AppError> {
        let user = StoredUser {
            id: nanoid::nanoid!(12),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: unix_now(),
        };

        let mut con = self.connection().await?;

        // SET NX on the email key is the uniqueness constraint; losing the
        // claim means another record with this email already exists.
        let claimed = claim_email(&mut con, &user.email, &user.id).await?;
        if !claimed {
            return Err(AppError::DuplicateEmail);
        }

        store_user(&mut con, &user).await?;
        Ok(user)
    }
}
