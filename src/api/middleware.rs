//! API middleware
//!
//! Contains:
//! - Shared application state
//! - The JSON error envelope returned by every endpoint
//! - Authentication (session cookie validation)

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::cookies;
use crate::config::SessionConfig;
use crate::db::DynDatabasePool;
use crate::models::User;
use crate::services::{SessionService, SessionServiceError};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub session_service: Arc<SessionService>,
    pub session_config: Arc<SessionConfig>,
}

impl AppState {
    /// Session token from the configured cookie, if the request carries one
    pub fn session_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        cookies::extract_cookie(headers, &self.session_config.cookie_name)
    }
}

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    /// Log the full error chain and return a generic 500.
    ///
    /// Internal details never reach the client.
    pub fn internal(context: &str, err: &anyhow::Error) -> Self {
        tracing::error!(error = ?err, "{}", context);
        Self::internal_error("Internal server error")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Authentication middleware
///
/// Resolves the session cookie to a user and stores it in the request
/// extensions for the `AuthenticatedUser` extractor.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = state.session_token(request.headers());

    let user = state
        .session_service
        .authenticate(token)
        .await
        .map_err(|e| match e {
            SessionServiceError::MissingSessionCookie => {
                ApiError::unauthorized("Missing session cookie")
            }
            SessionServiceError::Internal(err) => {
                ApiError::internal("Session validation failed", &err)
            }
            _ => ApiError::unauthorized("Invalid or expired session"),
        })?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

// ============================================================================
// Tests
// ============================================================================
