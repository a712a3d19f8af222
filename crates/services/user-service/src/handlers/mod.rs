//! HTTP handlers.

pub mod health_handler;
pub mod system_handler;
pub mod user_handler;

pub use health_handler::health_check;
pub use system_handler::{metrics_handler, root};
pub use user_handler::user_routes;
