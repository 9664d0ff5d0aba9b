use anyhow::Context;
use docsum::{api, config, logging, processing::SummaryService};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may carry RUST_LOG and DOCSUM_LOG_FILE, so it is loaded before tracing starts.
    dotenvy::dotenv().ok();
    logging::init_tracing();
    let config = config::load_config().context("Failed to load config from environment")?;
    let service =
        SummaryService::from_config(&config).context("Failed to build summarization client")?;
    let app = api::create_router(Arc::new(service), &config);

    let listener = bind_listener(&config).await?;
    tracing::info!(
        "Listening on http://{}:{}",
        config.server_host,
        config.server_port
    );
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

async fn bind_listener(config: &config::Config) -> anyhow::Result<TcpListener> {
    let address = (config.server_host.as_str(), config.server_port);
    let listener = TcpListener::bind(address).await.with_context(|| {
        format!(
            "Failed to bind {}:{}",
            config.server_host, config.server_port
        )
    })?;
    tracing::debug!(port = config.server_port, "Bound server port");
    Ok(listener)
}
