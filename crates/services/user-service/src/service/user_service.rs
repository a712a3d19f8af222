//! User service - Handles user-related business logic.
//!
//! Cache-unaware; the cached variant lives in [`super::cache_proxy`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use common::{AppError, AppResult, OptionExt};
use domain::{CreateUser, ListQuery, User, MIN_USER_AGE};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
///
/// Implemented both by the direct service and by the cache-aside proxy, so
/// callers do not know which one they hold.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// List active users. Fails with a validation error when `limit <= 0`.
    async fn list_users(&self, offset: i64, limit: i64) -> AppResult<Vec<User>>;

    /// Get active user by email
    async fn get_user(&self, email: &str) -> AppResult<User>;

    /// Create a new user and return its assigned id
    async fn create_user(&self, input: CreateUser) -> AppResult<i32>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        let query = ListQuery::new(offset, limit)?;
        self.repo.list(query).await
    }

    async fn get_user(&self, email: &str) -> AppResult<User> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_not_found("user")
    }

    async fn create_user(&self, input: CreateUser) -> AppResult<i32> {
        // Age first: its message is what an underage, incomplete payload reports
        if !input.age_is_valid() {
            return Err(AppError::validation(format!(
                "user age must be at least {}, got {}",
                MIN_USER_AGE, input.age
            )));
        }
        input.check_required_fields()?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("user with this email"));
        }

        let email = input.email.clone();
        let id = self.repo.create(input).await?;
        info!(user_id = id, email = %email, "User created");

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn new_user(age: i32) -> CreateUser {
        CreateUser {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            name: "Ada".to_string(),
            age,
        }
    }

    fn stored_user() -> User {
        User::from_create(1, new_user(36))
    }

    #[tokio::test]
    async fn test_list_rejects_non_positive_limit() {
        let mut repo = MockUserRepository::new();
        repo.expect_list().never();
        let service = UserManager::new(Arc::new(repo));

        for limit in [0, -1, i64::MIN] {
            let err = service.list_users(0, limit).await.unwrap_err();
            assert!(err.is_invalid_argument(), "limit {}: {:?}", limit, err);
        }
    }

    #[tokio::test]
    async fn test_list_passes_offset_through() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .with(eq(ListQuery { offset: -4, limit: 2 }))
            .times(1)
            .returning(|_| Ok(vec![]));
        let service = UserManager::new(Arc::new(repo));

        assert!(service.list_users(-4, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        let service = UserManager::new(Arc::new(repo));

        let err = service.get_user("missing@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_user_propagates_backend_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(AppError::service_unavailable("database timed out")));
        let service = UserManager::new(Arc::new(repo));

        let err = service.get_user("ada@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_underage_without_touching_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().never();
        repo.expect_create().never();
        let service = UserManager::new(Arc::new(repo));

        let err = service.create_user(new_user(17)).await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("got 17"), "{}", err);
    }

    #[tokio::test]
    async fn test_create_checks_age_before_required_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();
        let service = UserManager::new(Arc::new(repo));

        let mut input = new_user(10);
        input.name = String::new();

        let err = service.create_user(input).await.unwrap_err();
        assert!(err.to_string().contains("age"), "{}", err);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();
        let service = UserManager::new(Arc::new(repo));

        let mut input = new_user(30);
        input.name = "  ".to_string();

        let err = service.create_user(input).await.unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[tokio::test]
    async fn test_create_conflict_on_existing_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("ada@example.com"))
            .returning(|_| Ok(Some(stored_user())));
        repo.expect_create().never();
        let service = UserManager::new(Arc::new(repo));

        let err = service.create_user(new_user(30)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_returns_assigned_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|input| input.email == "ada@example.com" && input.age == 18)
            .times(1)
            .returning(|_| Ok(42));
        let service = UserManager::new(Arc::new(repo));

        assert_eq!(service.create_user(new_user(18)).await.unwrap(), 42);
    }
}
