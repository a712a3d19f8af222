//! User domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::validation::{age_is_eligible, require_field};

/// User domain entity.
///
/// Soft-deleted rows never leave the repository, so a `User` is always an
/// active record. The full record (credential included) is what the cache
/// stores; responses use [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by the store
    pub id: i32,
    pub email: String,
    /// Opaque credential, stored as submitted
    pub password: String,
    pub name: String,
    pub age: i32,
}

impl User {
    /// Build a persisted user from a create payload and its store-assigned id.
    pub fn from_create(id: i32, input: CreateUser) -> Self {
        Self {
            id,
            email: input.email,
            password: input.password,
            name: input.name,
            age: input.age,
        }
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUser {
    /// User email address (unique among active users)
    pub email: String,
    /// Opaque credential
    pub password: String,
    /// User display name
    pub name: String,
    /// Age in years
    pub age: i32,
}

impl CreateUser {
    /// Check the age eligibility rule
    pub fn age_is_valid(&self) -> bool {
        age_is_eligible(self.age)
    }

    /// Ensure every required field carries a value.
    pub fn check_required_fields(&self) -> DomainResult<()> {
        require_field("email", &self.email)?;
        require_field("name", &self.name)?;
        Ok(())
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Store-assigned identifier
    pub id: i32,
    /// User email address
    pub email: String,
    /// User display name
    pub name: String,
    /// Age in years
    pub age: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            age: user.age,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            age: user.age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(age: i32) -> CreateUser {
        CreateUser {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            name: "Ada".to_string(),
            age,
        }
    }

    #[test]
    fn test_from_create_keeps_submitted_fields() {
        let user = User::from_create(7, payload(30));
        assert_eq!(user.id, 7);
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password, "secret");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.age, 30);
    }

    #[test]
    fn test_age_boundary() {
        assert!(!payload(17).age_is_valid());
        assert!(payload(18).age_is_valid());
    }

    #[test]
    fn test_required_fields() {
        let mut input = payload(20);
        assert!(input.check_required_fields().is_ok());

        input.name = "   ".to_string();
        assert!(input.check_required_fields().is_err());
    }

    #[test]
    fn test_response_hides_password() {
        let user = User::from_create(1, payload(40));
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_user_serialization_keeps_credential() {
        let user = User::from_create(1, payload(40));
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
