//! Persistence layer for users and sessions.
//!
//! The `UserStore` trait is the seam the actions talk to. The production
//! backend keeps records as JSON in Redis; `memory` is the in-memory
//! backend used by the test suite and Redis-free local runs.

pub mod memory;
pub mod session;
pub mod user;

use crate::error::AppError;
use crate::models::{NewUser, StoredUser};
use async_trait::async_trait;

/// User persistence keyed by a globally unique email.
///
/// `create` owns id generation and the uniqueness guarantee: when two
/// concurrent inserts race on the same email, exactly one wins and the
/// other fails with [`AppError::DuplicateEmail`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AppError>;

    async fn create(&self, new_user: NewUser) -> Result<StoredUser, AppError>;
}
