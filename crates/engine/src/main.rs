use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use archive_engine::api;
use archive_engine::{BackendConfiguration, Dispatcher, EngineConfig};
use archive_shared::{toolbelts, Inventory};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to read .env: {}", e);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Astro Archive...");
    let config = EngineConfig::from_env()?;

    // A missing or broken inventory file degrades to an empty inventory
    let inventory = match Inventory::load(&config.inventory_path) {
        Ok(inventory) => {
            info!("Loaded {} inventory items from {}", inventory.len(), config.inventory_path.display());
            inventory
        }
        Err(e) => {
            error!("Could not load local inventory file: {:#}", e);
            Inventory::default()
        }
    };
    if inventory.is_empty() {
        warn!("Inventory is empty; only tool lookups can produce useful answers");
    }

    let tools = toolbelts::standard_registry(&config.ntrs_base_url, config.lookup_timeout)?;
    let backends = BackendConfiguration::establish(&config).await?;
    let dispatcher = Dispatcher::new(backends, inventory, tools);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let addr = config.bind_addr;
    let mut api_handle = tokio::spawn(api::start_server(addr, dispatcher, shutdown_rx));

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Received shutdown signal...");
            let _ = shutdown_tx.send(true);
            if let Ok(Err(e)) = api_handle.await {
                error!("API server stopped with error: {:#}", e);
            }
        }
        finished = &mut api_handle => {
            // Server exited on its own (e.g. the port was taken)
            finished??;
        }
    }

    info!("Astro Archive shutdown complete.");
    Ok(())
}
