//! Password hashing and verification.
//!
//! Argon2id with the crate's default parameters and a random per-hash salt,
//! so equal plaintexts never produce equal digests. Digests are PHC strings
//! (`$argon2id$...`); the salt and parameters travel inside the digest.

use crate::error::AppError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password into a storable PHC-string digest.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored digest.
///
/// A malformed digest verifies as false rather than erroring: from the
/// caller's perspective it is simply a credential mismatch.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
