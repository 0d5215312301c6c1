//! Session token generation and cookie plumbing.
//!
//! Tokens are opaque: 32 random bytes, base64-encoded. They travel in an
//! `HttpOnly` cookie and are the only thing the client ever holds; the
//! session record itself lives server-side.

use crate::config::Config;
use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use base64::{engine::general_purpose, Engine as _};
use rand::Rng;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "doorman_session";

/// Generate a cryptographically random session token.
///
/// Returns a base64-encoded string (44 characters) from 32 random bytes.
pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}

/// Build the `Set-Cookie` value carrying a session token.
///
/// `Secure` is only added when the deployment serves HTTPS, otherwise the
/// browser would drop the cookie on plain-HTTP local setups.
pub fn session_cookie(
    config: &Config,
    token: &str,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.session_ttl_secs
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(
    config: &Config,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the session token out of the request's `Cookie` header, if present.
///
/// Pairs without a value (flag-style or empty segments) are skipped; a
/// malformed neighbor must not hide the session cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let Some(key) = parts.next() else {
            continue;
        };
        let Some(val) = parts.next() else {
            continue;
        };
        if key.trim() == SESSION_COOKIE {
            return Some(val.trim().to_string());
        }
    }
    None
}
