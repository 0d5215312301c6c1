use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Config {
    // Redis
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,

    // Sessions
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Redis — required to prevent silent unauthenticated connections
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // Sessions
        let session_ttl_secs = parse_env_or_default("SESSION_TTL_SECS", 86_400)?;
        let cookie_secure = parse_env_or_default("COOKIE_SECURE", false)?;

        Ok(Config {
            redis_url,
            bind_addr,
            session_ttl_secs,
            cookie_secure,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests run serially since they modify global env vars.
    // unwrap_or_else handles poison from prior panics.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_test_env() {
        env::remove_var("REDIS_URL");
        env::remove_var("BIND_ADDR");
        env::remove_var("SESSION_TTL_SECS");
        env::remove_var("COOKIE_SECURE");
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        env::set_var("TEST_U64", "12345");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_U64");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_defaults() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.session_ttl_secs, 86_400);
        assert!(!config.cookie_secure);

        clear_test_env();
    }

    #[test]
    fn test_missing_redis_url() {
        let _guard = lock_test();
        clear_test_env();

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::MissingVar(ref s) if s == "REDIS_URL"
        ));
    }

    #[test]
    fn test_invalid_bind_addr() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("BIND_ADDR", "not-an-address");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "BIND_ADDR"
        ));

        clear_test_env();
    }

    #[test]
    fn test_invalid_session_ttl() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("SESSION_TTL_SECS", "soon");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "SESSION_TTL_SECS"
        ));

        clear_test_env();
    }

    #[test]
    fn test_debug_redacts_redis_url() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://:hunter2@127.0.0.1:6379");

        let config = Config::from_env().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));

        clear_test_env();
    }
}
