//! Repository pattern for user storage
//!
//! Handlers only see the `UserRepository` trait; the in-memory implementation
//! is what the server wires in.

use crate::core::error::{GateError, Result};
use crate::store::models::UserRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage operations over user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact, case-sensitive username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Check whether a username is taken
    async fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Insert a new user and assign it the next id.
    ///
    /// The duplicate check and the insert happen as one step: of two
    /// concurrent inserts for the same username exactly one succeeds, the
    /// other gets `GateError::DuplicateUser`.
    async fn insert(&self, username: &str, password_hash: String) -> Result<UserRecord>;

    /// Count stored users
    async fn count(&self) -> Result<usize>;
}

#[derive(Debug)]
struct Users {
    by_username: HashMap<String, UserRecord>,
    next_id: u64,
}

/// Process-local user storage; contents are lost on restart
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: RwLock<Users>,
}

impl InMemoryUserRepository {
    /// Create an empty repository; the first user gets id 1
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Users {
                by_username: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.by_username.get(username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: String) -> Result<UserRecord> {
        // Held across check and insert
        let mut users = self.users.write().await;

        if users.by_username.contains_key(username) {
            return Err(GateError::DuplicateUser);
        }

        let record = UserRecord {
            id: users.next_id,
            username: username.to_string(),
            password_hash,
        };
        users.next_id += 1;
        users
            .by_username
            .insert(record.username.clone(), record.clone());

        Ok(record)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.read().await.by_username.len())
    }
}
