//! Session service
//!
//! Owns the session lifecycle:
//! - login: check credentials, issue a token, persist the session
//! - check: report whether a token maps to a live session
//! - logout: end a session
//! - cleanup: sweep sessions whose expiry has passed
//!
//! The HTTP layer decides what each outcome looks like on the wire; this
//! module only distinguishes the cases.

use crate::config::SessionConfig;
use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, SessionStatus, User};
use crate::services::password::{verify_password, DUMMY_PASSWORD_HASH};
use crate::services::token::{generate_session_token, is_well_formed_token};
use anyhow::Context;
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Error types for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    /// No user matches the login identifier
    #[error("User not found")]
    UserNotFound,

    /// The password does not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request carried no session cookie
    #[error("Missing session cookie")]
    MissingSessionCookie,

    /// The token does not match any stored session
    #[error("Session not found")]
    SessionNotFound,

    /// The session exists but its expiry has passed
    #[error("Session expired")]
    SessionExpired,

    /// Store or hashing failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Session service for login, session checks and logout
pub struct SessionService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    lifetime: Duration,
    revoke_on_logout: bool,
}

impl SessionService {
    /// Create a new session service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            lifetime: config.lifetime(),
            revoke_on_logout: config.revoke_on_logout,
        }
    }

    /// The single session lifetime used for stored expiry and cookie max-age
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Login with credentials
    ///
    /// Looks the user up by email or nickname, verifies the password and
    /// persists a fresh session expiring `lifetime()` from now.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no user matches the identifier
    /// - `InvalidCredentials` if the password is wrong
    /// - `Internal` for store or hash-format failures
    pub async fn login(&self, input: LoginInput) -> Result<Session, SessionServiceError> {
        let user = self
            .user_repo
            .get_by_login_identifier(&input.username)
            .await
            .context("Failed to look up user")?;

        // Unknown users still pay for a hash verification
        let hash = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |user| user.password_hash.as_str())
            .to_string();
        let password = input.password;
        let password_valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .context("Password verification task failed")?
            .context("Failed to verify password")?;

        let user = match user {
            Some(user) if password_valid => user,
            Some(_) => return Err(SessionServiceError::InvalidCredentials),
            None => return Err(SessionServiceError::UserNotFound),
        };

        let session = Session::new(generate_session_token(), user.id, Utc::now(), self.lifetime)
            .context("Session expiry is out of range")?;
        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        tracing::info!(user_id = user.id, expires_at = %created.expires_at, "Session issued");

        Ok(created)
    }

    /// Report the state of the session behind an optional cookie token.
    ///
    /// Absence of a token, an unknown token and a malformed token all yield
    /// `SessionStatus::Absent`. Expired sessions are reported but left in
    /// the store for `cleanup_expired_sessions`.
    ///
    /// # Errors
    ///
    /// Only store failures; "no such record" is not an error.
    pub async fn check(&self, token: Option<&str>) -> Result<SessionStatus, SessionServiceError> {
        let token = match token {
            Some(token) if is_well_formed_token(token) => token,
            _ => return Ok(SessionStatus::Absent),
        };

        let session = self
            .session_repo
            .get_by_token(token)
            .await
            .context("Failed to get session")?;

        Ok(match session {
            None => SessionStatus::Absent,
            Some(session) if session.is_expired() => SessionStatus::Expired(session),
            Some(session) => SessionStatus::Active(session),
        })
    }

    /// Resolve a cookie token to the user owning an active session.
    ///
    /// # Errors
    ///
    /// - `MissingSessionCookie` when no token was sent
    /// - `SessionNotFound` when the token matches nothing (or its user is gone)
    /// - `SessionExpired` when the session's expiry has passed
    pub async fn authenticate(&self, token: Option<&str>) -> Result<User, SessionServiceError> {
        if token.is_none() {
            return Err(SessionServiceError::MissingSessionCookie);
        }

        let session = match self.check(token).await? {
            SessionStatus::Active(session) => session,
            SessionStatus::Expired(_) => return Err(SessionServiceError::SessionExpired),
            SessionStatus::Absent => return Err(SessionServiceError::SessionNotFound),
        };

        self.user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get session user")?
            .ok_or(SessionServiceError::SessionNotFound)
    }

    /// Logout
    ///
    /// Requires a cookie token; calling logout without one is an error, not a
    /// no-op. When `revoke_on_logout` is set the stored session is deleted so
    /// the token stops validating immediately; otherwise only the caller's
    /// cookie is cleared and the row lives until it expires.
    ///
    /// # Errors
    ///
    /// - `MissingSessionCookie` when no token was sent
    /// - `Internal` for store failures
    pub async fn logout(&self, token: Option<&str>) -> Result<(), SessionServiceError> {
        let token = token.ok_or(SessionServiceError::MissingSessionCookie)?;

        if self.revoke_on_logout {
            let removed = self
                .session_repo
                .delete(token)
                .await
                .context("Failed to delete session")?;
            tracing::debug!(removed, "Session revoked on logout");
        }

        Ok(())
    }

    /// Delete all expired sessions
    ///
    /// Returns the number of sessions deleted.
    pub async fn cleanup_expired_sessions(&self) -> Result<i64, SessionServiceError> {
        let count = self
            .session_repo
            .delete_expired(Utc::now())
            .await
            .context("Failed to delete expired sessions")?;

        Ok(count)
    }
}

/// Input for user login
#[derive(Debug, Clone)]
pub struct LoginInput {
    /// Email or nickname
    pub username: String,
    pub password: String,
}

impl LoginInput {
    /// Create a new login input
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
