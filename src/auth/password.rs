//! Password hashing and verification using bcrypt

use crate::core::error::{GateError, Result};

/// Hash a password using bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| GateError::Hashing(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| GateError::Hashing(format!("Failed to verify password: {}", e)))
}
