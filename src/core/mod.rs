//! Core building blocks shared by the rest of the service
//!
//! - Layered configuration
//! - Error type and HTTP mapping
//! - Structured logging

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{GateError, Result};
pub use logging::Logger;
