// src/main.rs

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ethernet_search::{
    api::create_router, blockchain::EvmClient, config::Config, rich_list::RichList, AppState,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.bind_address, state.config.port)
        .parse()
        .context("BIND_ADDRESS and PORT must form a valid socket address")?;

    let app = create_router(state);

    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("HTTP server terminated")?;
    Ok(())
}

async fn run() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize the chain client
    let client = EvmClient::new(&config.rpc_url, config.rpc_timeout())?;
    info!(
        "Using RPC endpoint {} (timeout {}s)",
        client.url(),
        config.rpc_timeout_secs
    );

    let rich_list = RichList::load(config.rich_list_path.as_deref().map(Path::new))?;
    info!("Rich list loaded with {} entries", rich_list.entries().len());

    let state = AppState {
        config,
        chain: Arc::new(client),
        rich_list: Arc::new(rich_list),
    };

    run_http_server(state).await
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ethernet_search=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}
