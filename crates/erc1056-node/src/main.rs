use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "erc1056_node=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_address = config.bind_address;
    tracing::info!("Starting erc1056 node on {}", bind_address);

    // Initialize application state
    let state = Arc::new(AppState::new(config).await?);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Identity reads
        .route(
            "/v1/identities/:identity/owner",
            get(api::identity::get_owner),
        )
        .route(
            "/v1/identities/:identity/changed",
            get(api::identity::get_changed),
        )
        .route(
            "/v1/identities/:identity/delegates/:delegate_type/:delegate",
            get(api::identity::get_delegate),
        )
        .route(
            "/v1/identities/:identity/history",
            get(api::identity::get_history),
        )
        .route(
            "/v1/identities/:identity/attributes",
            get(api::identity::get_attributes),
        )
        // Signed meta-transactions
        .route(
            "/v1/identities/:identity/digest",
            post(api::signed::get_digest),
        )
        .route(
            "/v1/identities/:identity/owner/signed",
            post(api::signed::change_owner_signed),
        )
        .route(
            "/v1/identities/:identity/delegates/signed",
            post(api::signed::add_delegate_signed),
        )
        .route(
            "/v1/identities/:identity/delegates/revoke/signed",
            post(api::signed::revoke_delegate_signed),
        )
        .route(
            "/v1/identities/:identity/attributes/signed",
            post(api::signed::set_attribute_signed),
        )
        .route(
            "/v1/identities/:identity/attributes/revoke/signed",
            post(api::signed::revoke_attribute_signed),
        )
        // Live events
        .route("/v1/events/stream", get(api::events::stream_events))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Graceful shutdown initiated");
}
