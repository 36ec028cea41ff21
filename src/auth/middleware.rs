//! Authentication middleware
//!
//! Sits in front of protected routes: pulls the bearer token out of the
//! `Authorization` header, verifies it, and hands the identity to the handler
//! through request extensions.

use crate::api::handlers::AppState;
use crate::auth::jwt::Identity;
use crate::core::error::GateError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Identity of the caller, available to handlers behind `authenticate`
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

/// Authentication middleware
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers());

    let identity = match state.tokens.verify(token) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::info!(
                reason = %e,
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            return GateError::from(e).into_response();
        }
    };

    tracing::debug!(user_id = identity.id, username = %identity.username, "Token accepted");

    request.extensions_mut().insert(AuthUser(identity));
    next.run(request).await
}

/// Token from an `Authorization: Bearer <token>` header, if any.
///
/// The token is the second space-separated field of the header. The scheme
/// name is not inspected, so `Basic xyz` yields `xyz` and fails verification
/// later. A missing or empty second field (`Bearer`, `Bearer  x`) is no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.split(' ').nth(1).filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(GateError::TokenMissing)
    }
}
