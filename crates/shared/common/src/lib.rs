//! Common utilities shared across the service crates.
//!
//! This crate provides:
//! - Unified error handling mapped onto HTTP responses
//! - The uniform response envelope
//! - Configuration structures
//! - Timeout bounding for backend calls

pub mod config;
pub mod error;
pub mod response;
pub mod timeout;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use response::{ApiResponse, Created, ErrorDetail};
pub use timeout::with_timeout;
