//! Credential registration and checking
//!
//! Wraps a `UserRepository` with bcrypt hashing. Hashing and verification run
//! on tokio's blocking pool; both finish before the caller gets a result.

use crate::auth::password::{hash_password, verify_password};
use crate::core::error::{GateError, Result};
use crate::store::{UserRecord, UserRepository};
use std::sync::Arc;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Register a new user.
    ///
    /// Fails with `DuplicateUser` if the username is taken. The repository
    /// re-checks under its write lock, so a concurrent registration that wins
    /// the race while we hash still turns this call into `DuplicateUser`.
    pub async fn register(&self, username: &str, password: String) -> Result<UserRecord> {
        if self.users.exists(username).await? {
            return Err(GateError::DuplicateUser);
        }

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| GateError::Internal(format!("Hashing task failed: {}", e)))??;

        self.users.insert(username, password_hash).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        self.users.find_by_username(username).await
    }

    /// Check `password` against the record's stored hash
    pub async fn verify_password(&self, record: &UserRecord, password: String) -> Result<bool> {
        let hash = record.password_hash.clone();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| GateError::Internal(format!("Verification task failed: {}", e)))?
    }

    /// Look a user up and check their password in one step
    pub async fn authenticate(&self, username: &str, password: String) -> Result<UserRecord> {
        let record = self
            .find_by_username(username)
            .await?
            .ok_or(GateError::UserNotFound)?;

        if !self.verify_password(&record, password).await? {
            return Err(GateError::IncorrectPassword);
        }

        Ok(record)
    }

    pub async fn user_count(&self) -> Result<usize> {
        self.users.count().await
    }
}
