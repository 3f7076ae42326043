//! Authentication API endpoints
//!
//! Handles HTTP requests for the session lifecycle:
//! - POST /api/v1/auth/login - Issue a session cookie
//! - POST /api/v1/auth/logout - End the session and clear the cookie
//! - GET /api/v1/auth/check-auth - Report whether the cookie is a live session
//! - GET /api/v1/auth/me - Get current user

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::cookies;
use crate::api::middleware::{self, ApiError, AppState, AuthenticatedUser};
use crate::models::User;
use crate::services::{LoginInput, SessionServiceError};

/// Same message for unknown user and wrong password
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or nickname
    pub username: String,
    pub password: String,
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response for check-auth
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

/// Response for user info
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
        }
    }
}

/// Build the auth router
pub fn router(state: AppState) -> Router<AppState> {
    protected_router(state).merge(public_router())
}

/// Build protected auth routes (behind the auth middleware)
pub fn protected_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ))
}

/// Build public auth routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check-auth", get(check_auth))
}

fn set_cookie_headers(cookie: &str) -> Result<HeaderMap, ApiError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| ApiError::internal("Invalid Set-Cookie value", &e.into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}

fn unexpected(context: &str, error: SessionServiceError) -> ApiError {
    match error {
        SessionServiceError::Internal(err) => ApiError::internal(context, &err),
        other => ApiError::internal(context, &anyhow::Error::new(other)),
    }
}

/// POST /api/v1/auth/login - User login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let session = state
        .session_service
        .login(LoginInput::new(body.username, body.password))
        .await
        .map_err(|e| match e {
            SessionServiceError::UserNotFound | SessionServiceError::InvalidCredentials => {
                tracing::warn!(reason = %e, "Login rejected");
                ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE)
            }
            other => unexpected("Login failed", other),
        })?;

    let config = &state.session_config;
    let cookie = cookies::session_cookie(
        &config.cookie_name,
        &session.token,
        state.session_service.lifetime().num_seconds(),
        config.cookie_secure,
    );

    Ok((
        set_cookie_headers(&cookie)?,
        Json(MessageResponse {
            message: "Login successful",
        }),
    ))
}

/// POST /api/v1/auth/logout - User logout
///
/// Fails with 400 when there is no session cookie to clear.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.session_token(&headers);

    state
        .session_service
        .logout(token)
        .await
        .map_err(|e| match e {
            SessionServiceError::MissingSessionCookie => {
                ApiError::validation_error("User already logged out")
            }
            other => unexpected("Logout failed", other),
        })?;

    let config = &state.session_config;
    let cookie = cookies::clear_session_cookie(&config.cookie_name, config.cookie_secure);

    Ok((
        set_cookie_headers(&cookie)?,
        Json(MessageResponse {
            message: "Logout successful",
        }),
    ))
}

/// GET /api/v1/auth/check-auth - Session status
///
/// A missing, unknown or expired session is `false`, not an error. Store
/// failures are 500.
async fn check_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthStatusResponse>, ApiError> {
    let status = state
        .session_service
        .check(state.session_token(&headers))
        .await
        .map_err(|e| unexpected("Session check failed", e))?;

    Ok(Json(AuthStatusResponse {
        is_authenticated: status.is_authenticated(),
    }))
}

/// GET /api/v1/auth/me - Get current user
///
/// Requires authentication.
async fn get_current_user(user: AuthenticatedUser) -> Json<UserResponse> {
    Json(user.0.into())
}
