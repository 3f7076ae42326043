//! User repository
//!
//! Read access to user records for credential checks. `create` exists for
//! seeding and tests; registration itself happens elsewhere.

use crate::db::{DynDatabasePool, PoolRef};
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return it with its assigned ID
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get the user whose email or nickname equals `identifier`
    async fn get_by_login_identifier(&self, identifier: &str) -> Result<Option<User>>;
}

/// SQLx-based user repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        match self.pool.pool_ref()? {
            PoolRef::Sqlite(pool) => create_user_sqlite(pool, user).await,
            PoolRef::Mysql(pool) => create_user_mysql(pool, user).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        match self.pool.pool_ref()? {
            PoolRef::Sqlite(pool) => get_user_by_id_sqlite(pool, id).await,
            PoolRef::Mysql(pool) => get_user_by_id_mysql(pool, id).await,
        }
    }

    async fn get_by_login_identifier(&self, identifier: &str) -> Result<Option<User>> {
        match self.pool.pool_ref()? {
            PoolRef::Sqlite(pool) => get_user_by_login_identifier_sqlite(pool, identifier).await,
            PoolRef::Mysql(pool) => get_user_by_login_identifier_mysql(pool, identifier).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_user_sqlite(pool: &SqlitePool, user: &User) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, nickname, password_hash, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&user.email)
    .bind(&user.nickname)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_rowid(),
        ..user.clone()
    })
}

async fn get_user_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, nickname, password_hash, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by ID")?;

    Ok(row.as_ref().map(row_to_user_sqlite))
}

async fn get_user_by_login_identifier_sqlite(
    pool: &SqlitePool,
    identifier: &str,
) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, nickname, password_hash, created_at
        FROM users
        WHERE email = ? OR nickname = ?
        LIMIT 1
        "#,
    )
    .bind(identifier)
    .bind(identifier)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by email or nickname")?;

    Ok(row.as_ref().map(row_to_user_sqlite))
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        nickname: row.get("nickname"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_user_mysql(pool: &MySqlPool, user: &User) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, nickname, password_hash, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&user.email)
    .bind(&user.nickname)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_id() as i64,
        ..user.clone()
    })
}

async fn get_user_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, nickname, password_hash, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by ID")?;

    Ok(row.as_ref().map(row_to_user_mysql))
}

async fn get_user_by_login_identifier_mysql(
    pool: &MySqlPool,
    identifier: &str,
) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, nickname, password_hash, created_at
        FROM users
        WHERE email = ? OR nickname = ?
        LIMIT 1
        "#,
    )
    .bind(identifier)
    .bind(identifier)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by email or nickname")?;

    Ok(row.as_ref().map(row_to_user_mysql))
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        nickname: row.get("nickname"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}
