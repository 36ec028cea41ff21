//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Request id tracing and HTTP spans
//! - CORS support
//! - Static file fallback

use crate::api::handlers::AppState;
use crate::api::middleware::request_id_middleware;
use crate::api::routes::build_api_routes;
use crate::auth::credentials::CredentialStore;
use crate::auth::jwt::TokenAuthority;
use crate::core::config::{SecurityConfig, ServerConfig};
use crate::core::Config;
use crate::store::InMemoryUserRepository;
use axum::{
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server backed by a fresh in-memory user store
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let users = Arc::new(InMemoryUserRepository::new());
        let credentials = Arc::new(CredentialStore::new(users, config.security.bcrypt_cost));
        let tokens = Arc::new(TokenAuthority::new(
            &config.security.jwt_secret,
            config.security.token_ttl_secs,
        ));

        info!(
            token_ttl_secs = config.security.token_ttl_secs,
            bcrypt_cost = config.security.bcrypt_cost,
            "Authentication configured"
        );

        Ok(Self::with_state(config, AppState::new(credentials, tokens)))
    }

    /// Create a server around an existing application state
    pub fn with_state(config: Config, state: AppState) -> Self {
        let router = build_router(&config, state);
        Self {
            router,
            config: config.server,
        }
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let ip: IpAddr = self.config.host.parse()?;
        let socket_addr = SocketAddr::new(ip, self.config.port);

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Build the full router: API routes, static fallback and global layers
pub fn build_router(config: &Config, state: AppState) -> Router {
    let static_files = ServeDir::new(&config.server.static_dir);

    build_api_routes(state)
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(&config.security)),
        )
}

/// Build CORS layer from allowed origins configuration
fn build_cors_layer(security: &SecurityConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if security.allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CliArgs;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::util::ServiceExt; // For oneshot method

    fn test_config(static_dir: &std::path::Path, origins: &str) -> Config {
        let env = [
            ("JWT_SECRET", "server-test-secret"),
            ("TOKENGATE_SECURITY__BCRYPT_COST", "4"),
            ("TOKENGATE_SECURITY__ALLOWED_ORIGINS", origins),
            (
                "TOKENGATE_SERVER__STATIC_DIR",
                static_dir.to_str().unwrap(),
            ),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Config::load_from(&CliArgs::default(), Some(env)).unwrap()
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();

        let server = ApiServer::new(test_config(dir.path(), "http://localhost:3000")).unwrap();

        let response = server
            .router()
            .clone()
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let missing = server
            .router()
            .clone()
            .oneshot(Request::builder().uri("/nope.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let dir = tempfile::tempdir().unwrap();
        let server = ApiServer::new(test_config(dir.path(), "http://localhost:3000")).unwrap();

        let response = server
            .router()
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/login")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_other_origin() {
        let dir = tempfile::tempdir().unwrap();
        let server = ApiServer::new(test_config(dir.path(), "http://localhost:3000")).unwrap();

        let response = server
            .router()
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/public")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let dir = tempfile::tempdir().unwrap();
        let server = ApiServer::new(test_config(dir.path(), "*")).unwrap();

        let response = server
            .router()
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(crate::api::middleware::REQUEST_ID_HEADER));
    }
}
