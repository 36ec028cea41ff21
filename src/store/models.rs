//! Stored data structures

/// A registered user
///
/// `password_hash` is a bcrypt string; the plaintext password is never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
}
