use std::net::SocketAddr;

use tokio::signal;

use screening_backend::{app, config::Settings, middleware, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first
    let settings = Settings::new()?;

    // Initialize structured logging with configuration
    middleware::init_logging(&settings.log_level, &settings.log_format)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    tracing::info!(
        "Starting sanctions screening backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    let port = settings.port;

    // Create application state with dependency injection
    let app_state = AppState::new(settings).await?;
    let app = app(app_state);

    // Run the server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
