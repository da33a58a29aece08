use crate::error::AppError;
use bcrypt::{hash, verify};

/// Irreversibly hashes a plaintext password. The plaintext is never stored;
/// only the resulting hash reaches the credential store.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, 12)
        .map_err(|e| AppError::PersistenceFailure(format!("Failed to hash password: {}", e)))
}

/// Compares a candidate password against a stored bcrypt hash.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::PersistenceFailure(format!("Failed to verify password: {}", e)))
}
