//! Health check endpoint
//!
//! - GET /api/v1/health - Service and database health

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};

/// Health check response payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Build the health router
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /api/v1/health - Ping the database
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .pool
        .ping()
        .await
        .map_err(|e| ApiError::internal("Health check failed", &e))?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::{build_router, AppState};
    use crate::config::SessionConfig;
    use crate::db::repositories::{SqlxSessionRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::services::SessionService;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_ok() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.unwrap();

        let config = SessionConfig::default();
        let service = SessionService::new(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool.clone()),
            &config,
        );
        let state = AppState {
            pool,
            session_service: Arc::new(service),
            session_config: Arc::new(config),
        };
        let app = build_router(state, "http://localhost:3000").unwrap();

        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
