use std::sync::Arc;

use similar_products_api::{
    api::{create_router, AppState},
    config::{self, Config},
    services::{providers::http::build_http_client, HttpProductClient, SimilarProductsService},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry RUST_LOG, so load it before the subscriber reads the filter
    config::load_dotenv();
    telemetry::init();

    let config = Config::from_env()?;

    // One HTTP transport for the whole process
    let http_client = build_http_client(&config)?;
    let client = HttpProductClient::from_config(http_client, &config)?;
    let service = SimilarProductsService::from_config(Arc::new(client), &config);

    let app = create_router(AppState::new(service), config.request_timeout());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        upstream = %config.similar_products_url,
        retry_max_attempts = config.retry_max_attempts,
        retry_wait_ms = config.retry_wait_duration_ms,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
