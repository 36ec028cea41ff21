//! HTTP API module
//!
//! This module provides the HTTP server and endpoints including:
//! - Route table and shared handler state
//! - Request id tracing middleware
//! - Server startup and graceful shutdown

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use models::HealthResponse;
pub use routes::build_api_routes;
pub use server::ApiServer;
