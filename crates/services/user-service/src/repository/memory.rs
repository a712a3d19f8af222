//! In-memory implementation of UserRepository (for development/testing).
//!
//! Mirrors the persisted layout: soft-deleted rows stay in the table and are
//! filtered out of every read.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::entities::user::Model;
use super::user_repository::UserRepository;
use common::{AppError, AppResult};
use domain::{CreateUser, ListQuery, User};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Model>,
    next_id: i32,
}

/// In-memory user table
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of physical rows, soft-deleted ones included
    pub async fn row_count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self, query: ListQuery) -> AppResult<Vec<User>> {
        let table = self.table.read().await;
        let offset = query.offset.max(0) as usize;

        Ok(table
            .rows
            .iter()
            .filter(|row| !row.is_deleted)
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .map(User::from)
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| !row.is_deleted && row.email == email)
            .cloned()
            .map(User::from))
    }

    async fn create(&self, input: CreateUser) -> AppResult<i32> {
        let mut table = self.table.write().await;

        // Same guarantee as the partial unique index
        if table
            .rows
            .iter()
            .any(|row| !row.is_deleted && row.email == input.email)
        {
            return Err(AppError::conflict("user with this email"));
        }

        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(Model {
            id,
            email: input.email,
            password: input.password,
            name: input.name,
            age: input.age,
            is_deleted: false,
        });

        tracing::debug!(user_id = id, "Inserted user row");
        Ok(id)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .iter_mut()
            .find(|row| !row.is_deleted && row.email == user.email)
            .ok_or_else(|| AppError::not_found("user"))?;

        row.password = user.password.clone();
        row.name = user.name.clone();
        row.age = user.age;
        Ok(())
    }

    async fn delete(&self, email: &str) -> AppResult<()> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .iter_mut()
            .find(|row| !row.is_deleted && row.email == email)
            .ok_or_else(|| AppError::not_found("user"))?;

        row.is_deleted = true;
        Ok(())
    }
}
