//! Argon2 password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::LazyLock;
use tracing::warn;

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(test)]
pub(crate) static PLACEHOLDER_CHECKS: AtomicUsize = AtomicUsize::new(0);

/// Verified in place of a real hash when the username does not exist, so the
/// response time is the same either way.
static PLACEHOLDER_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    hash_password("taskdesk-placeholder-secret")
        .map_err(|e| warn!(error = %e, "could not prepare placeholder hash"))
        .ok()
});

/// Hash a password into an Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Build the placeholder hash now so the first unknown username does not pay
/// for hashing on top of verification
pub fn prepare_placeholder() {
    LazyLock::force(&PLACEHOLDER_HASH);
}

/// Spend the same work as a real verification. Always fails.
pub fn verify_placeholder(password: &str) -> bool {
    if let Some(hash) = PLACEHOLDER_HASH.as_deref() {
        verify_password(password, hash);
        #[cfg(test)]
        PLACEHOLDER_CHECKS.fetch_add(1, Ordering::SeqCst);
    }
    false
}
