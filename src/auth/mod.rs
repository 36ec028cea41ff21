//! Authentication module
//!
//! This module provides authentication functionality including:
//! - User registration and login
//! - JWT token issuance and verification
//! - Password hashing and verification
//! - Authentication middleware

pub mod credentials;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use credentials::CredentialStore;
pub use handlers::{login, logout, profile, register};
pub use jwt::{Claims, Identity, TokenAuthority, TokenError};
pub use middleware::{authenticate, AuthUser};
pub use password::{hash_password, verify_password};
