//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Users
// =============================================================================

/// Minimum age a user must have to be accepted on create
pub const MIN_USER_AGE: i32 = 18;

// =============================================================================
// Pagination
// =============================================================================

/// Smallest accepted page size
pub const MIN_PAGE_LIMIT: i64 = 1;
