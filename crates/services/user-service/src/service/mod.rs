//! Service layer: the directory service and its cache-aside decorator.

pub mod cache_proxy;
mod user_service;

pub use cache_proxy::CachedUserService;
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
