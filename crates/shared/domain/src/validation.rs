//! Stateless business rules.
//!
//! Reusable independent of transport or storage.

use crate::constants::{MIN_PAGE_LIMIT, MIN_USER_AGE};
use crate::error::{DomainError, DomainResult};

/// Age eligibility: a user must be at least [`MIN_USER_AGE`] years old.
pub fn age_is_eligible(age: i32) -> bool {
    age >= MIN_USER_AGE
}

/// Limit validity: a page must request at least one row.
pub fn limit_is_valid(limit: i64) -> bool {
    limit >= MIN_PAGE_LIMIT
}

/// Reject blank values for a required field.
pub fn require_field(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Offset/limit pagination request.
///
/// Offset is not bounded here; the store decides what a negative or
/// out-of-range offset yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub offset: i64,
    pub limit: i64,
}

impl ListQuery {
    /// Validate the pagination bounds and build the query.
    pub fn new(offset: i64, limit: i64) -> DomainResult<Self> {
        if !limit_is_valid(limit) {
            return Err(DomainError::validation(format!(
                "limit must be greater than zero, got {}",
                limit
            )));
        }
        Ok(Self { offset, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_is_eligible() {
        assert!(!age_is_eligible(0));
        assert!(!age_is_eligible(17));
        assert!(age_is_eligible(18));
        assert!(age_is_eligible(99));
    }

    #[test]
    fn test_limit_is_valid() {
        assert!(!limit_is_valid(i64::MIN));
        assert!(!limit_is_valid(-1));
        assert!(!limit_is_valid(0));
        assert!(limit_is_valid(1));
    }

    #[test]
    fn test_list_query_rejects_non_positive_limit() {
        assert!(matches!(
            ListQuery::new(0, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_list_query_passes_offset_through() {
        let query = ListQuery::new(-5, 10).unwrap();
        assert_eq!(query.offset, -5);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_require_field() {
        assert!(require_field("email", "a@b.c").is_ok());
        assert_eq!(
            require_field("email", ""),
            Err(DomainError::Validation("email is required".to_string()))
        );
    }
}
