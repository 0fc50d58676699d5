//! Password hashing. Hashes are argon2id PHC strings with a random per-password salt, e.g.
//! `$argon2id$v=19$m=19456,t=2,p=1$...`.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::*;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Could not hash password: {0}")]
pub struct PasswordHashError(String);

pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordHashError(e.to_string()))
}

/// Returns true if `password` matches the stored `hash`. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            warn!("🔐️ Stored password hash could not be parsed: {e}");
            false
        },
    }
}
