//! Authentication layer: password digests, session tokens and cookies,
//! the session issuer seam, and request extractors.

pub mod issuer;
pub mod middleware;
pub mod password;
pub mod session;

pub use issuer::{MemoryIssuer, RedisIssuer, SessionIssuer};
pub use middleware::{AppState, CurrentSession, RequireSession};
pub use session::{generate_session_token, SESSION_COOKIE};
