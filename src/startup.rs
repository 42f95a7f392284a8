use crate::calendar::GoogleCalendarClient;
use crate::config::Config;
use crate::error::Error;
use crate::extraction::GeminiExtractor;
use crate::server::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the application state and serve the HTTP API
pub async fn run_server(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (port, api_key, model) = {
        let config_read = config.read().await;
        (
            config_read.port,
            config_read.gemini_api_key.clone(),
            config_read.gemini_model.clone(),
        )
    };

    let state = AppState {
        config: Arc::clone(&config),
        extractor: Arc::new(GeminiExtractor::new(api_key, model)),
        calendar: Arc::new(GoogleCalendarClient::new(Arc::clone(&config))),
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;
    axum::serve(listener, app).await.map_err(Error::from)?;

    Ok(())
}
