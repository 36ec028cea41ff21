//! User storage
//!
//! - `UserRecord`, the only persisted entity
//! - `UserRepository`, the storage seam handlers depend on
//! - `InMemoryUserRepository`, the process-local implementation

pub mod models;
pub mod repository;

pub use models::UserRecord;
pub use repository::{InMemoryUserRepository, UserRepository};
