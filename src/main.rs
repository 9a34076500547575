use marketplace_service::config::MarketplaceConfig;
use marketplace_service::observability::init_tracing;
use marketplace_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing("info,tower_http=debug");

    let config = MarketplaceConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("configuration error: {e}"))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start application: {}", e);
        std::io::Error::other(format!("startup error: {e}"))
    })?;

    app.run_until_stopped().await
}
