//! Password hashing.
//!
//! Credentials are stored only as argon2id PHC strings. This is the single
//! place in the codebase that touches raw passwords; services call `hash` on
//! registration and `verify` on login and never see hash internals.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hashes a raw password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hashed| hashed.to_string())
        .map_err(|e| {
            tracing::error!("password hashing failed: {e}");
            "Failed to process credentials".to_string()
        })
}

/// Verifies a raw password against a stored PHC string. An unparseable
/// stored hash counts as a mismatch rather than an error; the caller only
/// needs a yes/no.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("stored password hash is malformed: {e}");
            false
        }
    }
}
