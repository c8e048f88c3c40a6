use std::net::SocketAddr;

use anyhow::{Context, Result};
use page_render::config::Config;
use page_render::render::RenderManager;
use page_render::server::{self, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("page_render=info".parse()?)
                .add_directive("not_found=info".parse()?),
        )
        .init();

    info!("Starting page server");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Templates and localization must load before any traffic is accepted
    let render = RenderManager::create(
        &config.template_dir,
        &config.i18n_dir,
        &config.default_lang,
        config.render,
    )
    .context("Failed to initialize the render manager")?;
    let state = AppState::new(render).context("Failed to load page templates")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✓ Listening on {}", addr);
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
