//! Command implementations

use crate::output;
use colored::*;
use queuekeeper_core::docs::{self, DOCS_PATH};
use queuekeeper_core::{ConfigLoader, StatusManager, config_schema};
use std::path::Path;
use tracing::{debug, info};

/// Write the configuration reference and exit
pub fn generate_docs() -> anyhow::Result<()> {
    let path = Path::new(DOCS_PATH);
    docs::write(path, config_schema())?;
    println!(
        "{} Generated configuration docs: {}",
        "✓".green(),
        path.display()
    );
    Ok(())
}

/// Load config, take part in relay election and keep the dashboard fresh until Ctrl+C
pub async fn start() -> anyhow::Result<()> {
    let config_path = ConfigLoader::local_path();
    debug!("Loading configuration from {}", config_path.display());

    let config = match ConfigLoader::load_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            output::print_load_error(&e);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded for {}", config.identity());

    let mut status = StatusManager::new(&config)?;
    if status.coordination_enabled() {
        let is_relay = status.elect();
        info!(
            "Livechat relay {}",
            if is_relay { "claimed" } else { "held elsewhere" }
        );
    }

    let mut ticker = tokio::time::interval(status.dashboard().refresh_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => status.render_snapshot(),
            result = &mut shutdown => {
                if let Err(e) = result {
                    debug!("Signal handler failed: {}", e);
                }
                break;
            }
        }
    }

    info!("Shutting down");
    status.shutdown();
    Ok(())
}
