use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::database::init_db;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    let blob_store = common::storage::from_config(&config.storage)
        .await
        .context("Failed to initialize blob storage")?;
    blob_store
        .ensure_bucket_exists()
        .await
        .context("Failed to provision blob storage")?;
    info!(backend = ?config.storage.backend, "Blob storage ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db, config, blob_store);
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
