use crate::{database, error::ApiError, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

/// Health check endpoint with database connectivity check
pub async fn health_check(State(app_state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let database_healthy = database::health_check(&app_state.db_pool).await.is_ok();

    let health_status = json!({
        "status": if database_healthy { "healthy" } else { "unhealthy" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screening-backend",
        "checks": {
            "database": { "healthy": database_healthy }
        }
    });

    if !database_healthy {
        return Err(ApiError::internal("Service is unhealthy"));
    }

    Ok(Json(health_status))
}

/// Simple health check endpoint for load balancers
pub async fn health_check_simple() -> Result<&'static str, StatusCode> {
    Ok("OK")
}
