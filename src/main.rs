use anyhow::Context;
use nextblog::{AppState, config::AppConfig, routes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppConfig::load().context("Failed to load config.toml")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::new(settings.clone());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server_addr))?;
    tracing::info!(addr = %settings.server_addr, seeded = settings.seed_data, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
