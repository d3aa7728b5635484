pub mod handlers;

use crate::{
    Error, Result,
    config::Config,
    gateway::ChatGateway,
    ollama::OllamaClient,
};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub use handlers::AppState;

/// Builds the application router with CORS limited to `allowed_origin`.
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router> {
    let cors = cors_layer(allowed_origin)?;

    Ok(Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/models", get(handlers::models))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Lets a single origin through with credentials, any method and any header.
/// Requests from other origins get no `access-control-allow-origin`.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|e| {
        Error::config(format!(
            "Invalid allowed origin '{}': {}",
            allowed_origin, e
        ))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub async fn run(config: Config) -> Result<()> {
    let backend = OllamaClient::new(&config.ollama);
    info!("Forwarding to Ollama at {}", backend.base_url());
    info!("Default model: {}", config.ollama.default_model);

    let gateway = ChatGateway::new(Arc::new(backend), config.ollama.default_model.clone());
    let app = router(AppState::new(gateway), &config.server.allowed_origin)?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Application startup complete.");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Application shutting down.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
