pub mod analysis;
pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod diagnosis;
pub mod experts;
pub mod intake;
pub mod lifecycle;
pub mod models;
pub mod reservations;
pub mod uploads;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Core(#[from] core_state::CoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
}

/// Binary entry point: logging, config, database, seed, serve.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = config::ServerConfig::from_env();
    tracing::info!(
        db = %settings.database_path.display(),
        uploads = %settings.upload_dir.display(),
        "Configuration loaded"
    );

    let core = core_state::CoreState::open(&settings)?;
    {
        let conn = core.lock_db()?;
        experts::bootstrap(&conn).map_err(core_state::CoreError::from)?;
    }

    let addr = SocketAddr::new(settings.bind, settings.port);
    api::serve(Arc::new(core), addr).await?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
