//! pearl-analyzer - Pearl manuscript tag comparison service
//!
//! Loads the four poems, tags them through the Articut API and serves the
//! word-type and POS-tag comparison over HTTP.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use pearl_analyzer::services::ArticutClient;
use pearl_analyzer::types::{Tagger, UnavailableTagger};
use pearl_analyzer::{logging, AppState};
use pearl_common::config::{resolve_articut_credentials, TomlConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = logging::init();

    let (config, _config_path) = TomlConfig::load_or_default()?;
    log_level.apply_config_level(&config.logging.level)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        build_timestamp = env!("BUILD_TIMESTAMP"),
        profile = env!("BUILD_PROFILE"),
        "Starting pearl-analyzer"
    );

    let tagger: Arc<dyn Tagger> = match resolve_articut_credentials(&config.articut)
        .and_then(|creds| ArticutClient::new(&config.articut, creds))
    {
        Ok(client) => {
            info!(endpoint = %config.articut.endpoint, "Articut client configured");
            Arc::new(client)
        }
        Err(e) => {
            warn!(error = %e, "Articut unavailable; only cached poems can be analyzed");
            Arc::new(UnavailableTagger::new(e.to_string()))
        }
    };

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config, tagger);
    let app = pearl_analyzer::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
