//! Session Redis operations.
//!
//! Redis key patterns:
//! - `session:{token}` — session data (JSON), expiring via key TTL
//!
//! Session JSON is wrapped in `Zeroizing` so tokens are cleared from this
//! process's memory after deserialization. Redis keeps its own copy; this
//! only covers the application side.

use crate::models::StoredSession;
use redis::AsyncCommands;
use zeroize::Zeroizing;

/// Store a session with TTL.
pub async fn store_session<C>(
    con: &mut C,
    session: &StoredSession,
    ttl_secs: u64,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("session:{}", session.token);
    let json = serde_json::to_string(session).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON serialize",
            e.to_string(),
        ))
    })?;

    con.set_ex::<_, _, ()>(&key, json, ttl_secs).await?;
    Ok(())
}

/// Get a session by token.
pub async fn get_session<C>(
    con: &mut C,
    token: &str,
) -> Result<Option<StoredSession>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("session:{}", token);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            let session = serde_json::from_str(&zeroizing_data).map_err(|e| {
                redis::RedisError::from((
                    redis::ErrorKind::TypeError,
                    "JSON deserialize",
                    e.to_string(),
                ))
            })?;
            Ok(Some(session))
        }
        None => Ok(None),
    }
}

/// Delete a session. Returns true if it existed.
pub async fn delete_session<C>(con: &mut C, token: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("session:{}", token);
    let deleted: i32 = con.del(&key).await?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::generate_session_token;

    /// Requires a running Redis instance; skipped when none is reachable.
    #[tokio::test]
    async fn test_session_roundtrip() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let client = match redis::Client::open(redis_url) {
            Ok(c) => c,
            Err(_) => {
                eprintln!("Skipping test: Redis not available");
                return;
            }
        };
        let mut con = match client.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(_) => {
                eprintln!("Skipping test: Redis connection failed");
                return;
            }
        };

        let session = StoredSession {
            token: generate_session_token(),
            user_id: "u1".to_string(),
            name: "Alice Smith".to_string(),
            email: "a@x.com".to_string(),
            created_at: 0,
        };

        store_session(&mut con, &session, 60).await.unwrap();

        let found = get_session(&mut con, &session.token).await.unwrap();
        assert_eq!(found.unwrap().user_id, "u1");

        assert!(delete_session(&mut con, &session.token).await.unwrap());
        assert!(!delete_session(&mut con, &session.token).await.unwrap());
        assert!(get_session(&mut con, &session.token)
            .await
            .unwrap()
            .is_none());
    }
}
