use anyhow::Context;

use collection_api::config;
use collection_api::dispatch::DispatchTable;
use collection_api::server::Server;
use collection_api::{demo, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SERVER_PORT, CORS_ALLOWED_ORIGIN, etc.
    let _ = dotenvy::dotenv();

    // First access reads the environment, after .env has been applied
    let config = config::config();
    observability::init_tracing(&config.logging);
    tracing::info!("Starting collection-api in {:?} mode", config.environment);

    let table = DispatchTable::bind(demo::collections(&config.cors.allowed_origin))
        .context("binding collections")?;
    for url in table.urls() {
        tracing::info!(url, "Serving collection");
    }

    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    Server::new(addr, table).run().await?;
    Ok(())
}
