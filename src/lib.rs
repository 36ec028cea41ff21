//! tokengate
//!
//! A small username/password authentication service: registration with
//! bcrypt-hashed passwords, login issuing HS256 bearer tokens, and a guard
//! that protects routes behind those tokens.

pub mod api;
pub mod auth;
pub mod core;
pub mod store;

// Re-export commonly used types
pub use api::{ApiServer, AppState};
pub use auth::{CredentialStore, Identity, TokenAuthority};
pub use crate::core::{Config, GateError};
pub use store::{InMemoryUserRepository, UserRepository};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
