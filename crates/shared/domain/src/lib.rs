//! Domain layer - Core business entities and rules.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user record, the create payload and the stateless business rules
//! (age eligibility, pagination bounds, required fields).

pub mod constants;
pub mod error;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use user::{CreateUser, User, UserResponse};
pub use validation::{age_is_eligible, limit_is_valid, require_field, ListQuery};
