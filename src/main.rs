use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod handler;
mod http;
mod logger;
mod model;
mod repository;
mod server;
mod view;

use config::{AppState, Config, DatabaseConfig, StoreBackend};
use repository::{BrandRepository, InMemoryBrandRepository, MongoBrandRepository, RepositoryError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // One thread: requests are handled as local tasks on an event loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let brands = open_store(&cfg.database).await?;
    let listener = server::create_listener(addr)?;

    let backend = brands.backend();
    let state = Arc::new(AppState::new(cfg, brands));
    logger::log_server_start(&addr, &state.config, backend);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown))?;

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            Arc::new(AtomicUsize::new(0)),
            shutdown,
        ))
        .await
}

/// Open the process-wide store handle.
///
/// An unreachable MongoDB is logged, not fatal; the driver keeps retrying
/// and requests fail with 500 until it is back.
async fn open_store(
    config: &DatabaseConfig,
) -> Result<Arc<dyn BrandRepository>, RepositoryError> {
    match config.backend {
        StoreBackend::Memory => {
            logger::log_store_connected("in-memory store");
            Ok(Arc::new(InMemoryBrandRepository::new()))
        }
        StoreBackend::Mongo => {
            let repo = MongoBrandRepository::connect(config).await?;
            match repo.ping().await {
                Ok(()) => logger::log_store_connected(&format!(
                    "MongoDB database '{}'",
                    config.name
                )),
                Err(e) => logger::log_store_unreachable(&e),
            }
            Ok(Arc::new(repo))
        }
    }
}
