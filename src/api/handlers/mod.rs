//! Shared handler state and the non-auth endpoints

pub mod system;

pub use system::*;

use crate::auth::credentials::CredentialStore;
use crate::auth::jwt::TokenAuthority;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenAuthority>,
}

impl AppState {
    pub fn new(credentials: Arc<CredentialStore>, tokens: Arc<TokenAuthority>) -> Self {
        Self {
            credentials,
            tokens,
        }
    }
}
