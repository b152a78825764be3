//! Crop Prediction Server
//!
//! Hosts prediction flows over HTTP: clients fill in soil and climate
//! parameters section by section and submit them for a crop prediction.

use std::{net::SocketAddr, sync::Arc};

use crop_prediction_backend::{create_app, AppState, Config, SessionService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crop_server=debug,crop_prediction_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Crop Prediction Server");
    tracing::info!("Environment: {}", config.environment);

    let sessions = SessionService::from_config(&config)?;

    // Create application state
    let state = AppState {
        sessions,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
