use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use coffee_shop_api::config::AppConfig;
use coffee_shop_api::database::DatabaseManager;
use coffee_shop_api::middleware::cors_layer;
use coffee_shop_api::AppState;

#[derive(Parser, Debug)]
#[command(name = "coffee-shop-api", version, about = "Drinks menu REST API")]
struct Args {
    /// Listen port, overrides PORT / API_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Drop the drink table and reseed it before serving
    #[arg(long)]
    reset_db: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up AUTH0_DOMAIN, API_AUDIENCE, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting coffee shop API in {:?} mode", config.environment);
    tracing::info!(
        "Tokens accepted from {} for audience '{}'",
        config.auth.issuer(),
        config.auth.audience
    );

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open drink store")?;

    if args.reset_db {
        DatabaseManager::reset(&pool).await.context("failed to reset drink store")?;
    }

    let state = AppState::new(&config, pool)?;
    let app = coffee_shop_api::app(state, cors_layer(&config.security));

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Coffee shop API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
