//! Session repository
//!
//! Database operations for login sessions.
//!
//! This module provides:
//! - `SessionRepository` trait defining the interface for session data access
//! - `SqlxSessionRepository` implementing the trait for SQLite and MySQL

use crate::db::{DynDatabasePool, PoolRef};
use crate::models::Session;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session
    async fn create(&self, session: &Session) -> Result<Session>;

    /// Get session by token
    async fn get_by_token(&self, token: &str) -> Result<Option<Session>>;

    /// Delete a session; returns whether a row was removed
    async fn delete(&self, token: &str) -> Result<bool>;

    /// Delete sessions whose expiry is before `now`; returns the count
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<i64>;
}

/// SQLx-based session repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxSessionRepository {
    pool: DynDatabasePool,
}

impl SqlxSessionRepository {
    /// Create a new SQLx session repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SessionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    async fn create(&self, session: &Session) -> Result<Session> {
        match self.pool.pool_ref()? {
            PoolRef::Sqlite(pool) => create_session_sqlite(pool, session).await,
            PoolRef::Mysql(pool) => create_session_mysql(pool, session).await,
        }
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Session>> {
        match self.pool.pool_ref()? {
            PoolRef::Sqlite(pool) => get_session_by_token_sqlite(pool, token).await,
            PoolRef::Mysql(pool) => get_session_by_token_mysql(pool, token).await,
        }
    }

    async fn delete(&self, token: &str) -> Result<bool> {
        let affected = match self.pool.pool_ref()? {
            PoolRef::Sqlite(pool) => sqlx::query("DELETE FROM sessions WHERE token = ?")
                .bind(token)
                .execute(pool)
                .await
                .map(|r| r.rows_affected()),
            PoolRef::Mysql(pool) => sqlx::query("DELETE FROM sessions WHERE token = ?")
                .bind(token)
                .execute(pool)
                .await
                .map(|r| r.rows_affected()),
        }
        .context("Failed to delete session")?;

        Ok(affected > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<i64> {
        let affected = match self.pool.pool_ref()? {
            PoolRef::Sqlite(pool) => sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
                .bind(now)
                .execute(pool)
                .await
                .map(|r| r.rows_affected()),
            PoolRef::Mysql(pool) => sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
                .bind(now)
                .execute(pool)
                .await
                .map(|r| r.rows_affected()),
        }
        .context("Failed to delete expired sessions")?;

        Ok(affected as i64)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_session_sqlite(pool: &SqlitePool, session: &Session) -> Result<Session> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.token)
    .bind(session.user_id)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_token_sqlite(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    let row = sqlx::query(
        r#"
        SELECT token, user_id, expires_at, created_at
        FROM sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .context("Failed to get session by token")?;

    Ok(row.map(|row| Session {
        token: row.get("token"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }))
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_session_mysql(pool: &MySqlPool, session: &Session) -> Result<Session> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.token)
    .bind(session.user_id)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_token_mysql(pool: &MySqlPool, token: &str) -> Result<Option<Session>> {
    let row = sqlx::query(
        r#"
        SELECT token, user_id, expires_at, created_at
        FROM sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .context("Failed to get session by token")?;

    Ok(row.map(|row| {
        let expires_at: DateTime<Utc> = row.get("expires_at");
        let created_at: DateTime<Utc> = row.get("created_at");
        Session {
            token: row.get("token"),
            user_id: row.get("user_id"),
            expires_at,
            created_at,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;
    use chrono::Duration;

    async fn setup_test_repo() -> (SqlxSessionRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        // sessions.user_id has a foreign key to users
        let user = SqlxUserRepository::new(pool.clone())
            .create(&User::new(
                "owner@example.com".to_string(),
                "owner".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create test user");

        (SqlxSessionRepository::new(pool), user.id)
    }

    fn test_session(token: &str, user_id: i64, lifetime: Duration) -> Session {
        Session::new(token.to_string(), user_id, Utc::now(), lifetime).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let (repo, user_id) = setup_test_repo().await;
        let session = test_session("tok-1", user_id, Duration::minutes(15));

        repo.create(&session).await.expect("Failed to create session");
        let found = repo
            .get_by_token("tok-1")
            .await
            .expect("Failed to get session")
            .expect("Session not found");

        assert_eq!(found.token, "tok-1");
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.expires_at.timestamp(), session.expires_at.timestamp());
    }

    #[tokio::test]
    async fn test_get_unknown_token_is_none() {
        let (repo, _) = setup_test_repo().await;

        let found = repo.get_by_token("nonexistent").await.expect("Failed to get session");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_token_rejected() {
        let (repo, user_id) = setup_test_repo().await;
        let session = test_session("dup", user_id, Duration::minutes(15));

        repo.create(&session).await.expect("Failed to create session");

        assert!(repo.create(&session).await.is_err());
    }

    #[tokio::test]
    async fn test_session_requires_existing_user() {
        let (repo, user_id) = setup_test_repo().await;
        let orphan = test_session("orphan", user_id + 1000, Duration::minutes(15));

        assert!(repo.create(&orphan).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (repo, user_id) = setup_test_repo().await;
        repo.create(&test_session("gone", user_id, Duration::minutes(15)))
            .await
            .unwrap();

        assert!(repo.delete("gone").await.expect("Failed to delete session"));
        assert!(repo.get_by_token("gone").await.unwrap().is_none());
        assert!(!repo.delete("gone").await.expect("Second delete should not error"));
    }

    #[tokio::test]
    async fn test_delete_expired_sessions() {
        let (repo, user_id) = setup_test_repo().await;
        repo.create(&test_session("expired", user_id, Duration::hours(-1)))
            .await
            .unwrap();
        repo.create(&test_session("valid", user_id, Duration::minutes(15)))
            .await
            .unwrap();

        let deleted = repo
            .delete_expired(Utc::now())
            .await
            .expect("Failed to delete expired sessions");

        assert_eq!(deleted, 1);
        assert!(repo.get_by_token("expired").await.unwrap().is_none());
        assert!(repo.get_by_token("valid").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_multiple_sessions_per_user() {
        let (repo, user_id) = setup_test_repo().await;
        repo.create(&test_session("first", user_id, Duration::minutes(15)))
            .await
            .unwrap();
        repo.create(&test_session("second", user_id, Duration::minutes(15)))
            .await
            .unwrap();

        assert!(repo.get_by_token("first").await.unwrap().is_some());
        assert!(repo.get_by_token("second").await.unwrap().is_some());
    }
}
