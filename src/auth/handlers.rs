//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::middleware::AuthUser;
use crate::auth::models::{
    LoginRequest, MessageResponse, ProfileResponse, RegisterRequest, TokenResponse,
};
use crate::core::error::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// Handler for POST /register - User registration
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(username = %req.username, "User registration attempt");

    let user = state
        .credentials
        .register(&req.username, req.password)
        .await?;

    let total_users = state.credentials.user_count().await?;
    tracing::info!(
        user_id = user.id,
        username = %user.username,
        total_users,
        "User registered successfully"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully!")),
    ))
}

/// Handler for POST /login - User login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    tracing::info!(username = %req.username, "Login attempt");

    let user = state
        .credentials
        .authenticate(&req.username, req.password)
        .await?;

    let token = state.tokens.issue(user.id, &user.username)?;

    tracing::info!(user_id = user.id, username = %user.username, "Login successful");

    Ok(Json(TokenResponse { token }))
}

/// Handler for GET /profile - Protected profile
pub async fn profile(AuthUser(identity): AuthUser) -> Json<ProfileResponse> {
    tracing::info!(user_id = identity.id, "Serving profile");

    Json(ProfileResponse {
        message: format!("Welcome, {}!", identity.username),
        user: identity,
    })
}

/// Handler for POST /logout
///
/// Nothing is held server-side; the client discards its token.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully!"))
}
