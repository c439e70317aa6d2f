pub mod app;
pub mod catalog;
pub mod config;
pub mod detail;
mod error;
pub mod favorites;
pub mod session;
pub mod shell;
pub mod view;

pub use app::{App, Screen};
pub use config::Config;
pub use error::{CineScoutError, FetchError, StorageError};

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{PosterUrls, TmdbClient};
use crate::favorites::SqliteStore;

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let config = Config::load_default()?;
        let api_key = config::resolve_api_key(&config)?;

        let client = TmdbClient::new(
            &config.api_base_url,
            &api_key,
            &config.region,
            config.request_timeout(),
        )?;
        let store = SqliteStore::open(&config.database_path())?;
        info!("Using local store at {:?}", config.database_path());

        let mut app = App::new(
            client,
            store,
            config.default_sort,
            PosterUrls::new(&config.image_base_url),
        );
        app.start().await;
        shell::run_shell(&mut app, config.debounce()).await
    })
}
