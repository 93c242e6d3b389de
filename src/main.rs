//! HTTP server for the quote engine.
//!
//! Settings come from the environment (a `.env` file is honoured):
//! `QUOTE_ENGINE_CONFIG_DIR` points at the rate configuration directory and
//! `QUOTE_ENGINE_BIND` is the listen address.

use quote_engine::api::{AppState, create_router};
use quote_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config";
const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,quote_engine=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("QUOTE_ENGINE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let bind = std::env::var("QUOTE_ENGINE_BIND").unwrap_or_else(|_| DEFAULT_BIND.into());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        tenants = config.tenants().count(),
        "Rate configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(address = %bind, "Quote engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
