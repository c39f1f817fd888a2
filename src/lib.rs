use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    config::Settings,
    database::DatabasePool,
    repositories::{check_repo::SqlxCheckRepository, CheckRepository},
    services::{external::OpenSanctionsClient, CheckService, ReportGenerator},
};

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db_pool: DatabasePool,
    pub check_repository: Arc<dyn CheckRepository + Send + Sync>,
    pub check_service: Arc<CheckService>,
}

impl AppState {
    /// Create new application state, connecting to the database. A down
    /// database is logged but not fatal here; checks fail until it is
    /// reachable.
    pub async fn new(settings: Settings) -> Result<Self, error::ApiError> {
        let db_pool = database::connect_with_fallback(&settings.database_url).await?;
        Self::new_with_pool(settings, db_pool)
    }

    /// Create new application state with an existing database pool
    pub fn new_with_pool(
        settings: Settings,
        db_pool: DatabasePool,
    ) -> Result<Self, error::ApiError> {
        let check_repository: Arc<dyn CheckRepository + Send + Sync> =
            Arc::new(SqlxCheckRepository::new(db_pool.clone()));

        let mut screening_client =
            OpenSanctionsClient::new(settings.opensanctions_api_key.clone());
        if let Some(base_url) = &settings.opensanctions_base_url {
            screening_client = screening_client.with_base_url(base_url.clone());
        }

        let report_generator = Arc::new(ReportGenerator::new(
            &settings.report_storage_path,
            settings.notification_email.clone(),
        )?);

        let check_service = Arc::new(CheckService::new(
            check_repository.clone(),
            Arc::new(screening_client),
            report_generator,
        ));

        Ok(Self {
            settings: Arc::new(settings),
            db_pool,
            check_repository,
            check_service,
        })
    }
}

/// Build the application router with all routes and middleware layers
pub fn app(app_state: AppState) -> Router {
    let cors_layer = middleware::create_cors_layer(app_state.settings.cors_allow_origins.clone());

    Router::new()
        // Check endpoints
        .route("/api/check", post(handlers::check_handlers::run_check))
        .route("/api/recheck", get(handlers::check_handlers::recheck))
        // Generated report files
        .route("/reports/:file", get(handlers::report_handlers::serve_report))
        // Health check endpoints
        .route("/api/health", get(handlers::health_check))
        .route("/api/health/simple", get(handlers::health_check_simple))
        .with_state(app_state)
        // Apply middleware layers (global)
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(middleware::create_logging_layer())
        .layer(cors_layer)
}
