use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use lazy_static::lazy_static;

lazy_static! {
    // Same cost as real hashes, so a lookup miss takes as long as a wrong password.
    static ref DUMMY_HASH: Option<String> = hash("tasktrack-no-such-user", DEFAULT_COST).ok();
}

/// Hashes `password` with bcrypt. The random salt is embedded in the output.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("stored password hash could not be verified: {}", e);
            false
        }
    }
}

/// Burns one bcrypt verification for a username that does not exist.
///
/// Always returns false.
pub fn verify_against_dummy(password: &str) -> bool {
    if let Some(dummy) = DUMMY_HASH.as_ref() {
        verify_password(password, dummy);
    }
    false
}
