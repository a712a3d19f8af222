//! User repository implementation with soft delete support.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{with_timeout, AppError, AppResult};
use domain::{CreateUser, ListQuery, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Per-call bound applied when no explicit timeout is configured.
pub(crate) const DEFAULT_DB_TIMEOUT: Duration = Duration::from_secs(3);

/// User repository trait for dependency injection.
///
/// Every read excludes soft-deleted records. A missing record is `Ok(None)`,
/// distinct from transport or query errors.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List active users, ordered by id
    async fn list(&self, query: ListQuery) -> AppResult<Vec<User>>;

    /// Find active user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new active user and return its generated id
    async fn create(&self, input: CreateUser) -> AppResult<i32>;

    /// Update password, name and age of the active user with `user.email`
    async fn update(&self, user: &User) -> AppResult<()>;

    /// Soft delete the active user with this email
    async fn delete(&self, email: &str) -> AppResult<()>;
}

/// Base query for every read: only rows that are not soft-deleted.
fn active_users() -> Select<UserEntity> {
    UserEntity::find().filter(user::Column::IsDeleted.eq(false))
}

fn page_query(query: ListQuery) -> Select<UserEntity> {
    // Postgres rejects a negative OFFSET
    let offset = query.offset.max(0) as u64;

    active_users()
        .order_by_asc(user::Column::Id)
        .offset(offset)
        .limit(query.limit as u64)
}

fn email_query(email: &str) -> Select<UserEntity> {
    active_users().filter(user::Column::Email.eq(email))
}

/// Concrete implementation of UserRepository backed by Postgres
pub struct UserStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_DB_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn list(&self, query: ListQuery) -> AppResult<Vec<User>> {
        with_timeout("database", self.timeout, async {
            let models = page_query(query).all(&self.db).await?;
            Ok(models.into_iter().map(User::from).collect())
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        with_timeout("database", self.timeout, async {
            let result = email_query(email).one(&self.db).await?;
            Ok(result.map(User::from))
        })
        .await
    }

    async fn create(&self, input: CreateUser) -> AppResult<i32> {
        with_timeout("database", self.timeout, async {
            let active_model = ActiveModel {
                id: NotSet,
                email: Set(input.email),
                password: Set(input.password),
                name: Set(input.name),
                age: Set(input.age),
                is_deleted: Set(false),
            };

            let result = UserEntity::insert(active_model).exec(&self.db).await?;
            Ok(result.last_insert_id)
        })
        .await
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        with_timeout("database", self.timeout, async {
            let result = UserEntity::update_many()
                .col_expr(user::Column::Password, Expr::value(user.password.clone()))
                .col_expr(user::Column::Name, Expr::value(user.name.clone()))
                .col_expr(user::Column::Age, Expr::value(user.age))
                .filter(user::Column::Email.eq(user.email.as_str()))
                .filter(user::Column::IsDeleted.eq(false))
                .exec(&self.db)
                .await?;

            if result.rows_affected == 0 {
                return Err(AppError::not_found("user"));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, email: &str) -> AppResult<()> {
        // Soft delete: the row stays, reads stop seeing it
        with_timeout("database", self.timeout, async {
            let result = UserEntity::update_many()
                .col_expr(user::Column::IsDeleted, Expr::value(true))
                .filter(user::Column::Email.eq(email))
                .filter(user::Column::IsDeleted.eq(false))
                .exec(&self.db)
                .await?;

            if result.rows_affected == 0 {
                return Err(AppError::not_found("user"));
            }
            Ok(())
        })
        .await
    }
}
