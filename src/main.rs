use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    dosecal::startup::init_logging()?;

    info!("Starting dosecal");

    // Load configuration
    let config = dosecal::startup::load_config().await?;

    // Serve the reminder API
    dosecal::startup::run_server(config).await
}
