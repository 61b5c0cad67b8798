// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bazaar serve` and `bazaar migrate` command implementations.
//!
//! `serve` opens the SQLite store, builds the identity verifier, media
//! store, optional Gemini describer and Prometheus recorder, and runs the
//! gateway until a shutdown signal arrives. The store is checkpointed and
//! released after in-flight requests drain.

use std::sync::Arc;

use bazaar_config::model::BazaarConfig;
use bazaar_core::traits::{DescriptionAdapter, StorageAdapter};
use bazaar_core::{BazaarError, PluginAdapter};
use bazaar_auth::JwtIdentityVerifier;
use bazaar_gateway::{GatewayState, HealthState, start_server};
use bazaar_market::Marketplace;
use bazaar_media::LocalMediaStore;
use bazaar_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("bazaar={log_level},tower_http={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

async fn open_storage(config: &BazaarConfig) -> Result<Arc<SqliteStorage>, BazaarError> {
    if let Some(parent) = std::path::Path::new(&config.storage.database_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| BazaarError::Storage {
            source: Box::new(e),
        })?;
    }
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

/// Open the database, apply pending migrations, and exit.
pub async fn run_migrate(config: &BazaarConfig) -> Result<(), BazaarError> {
    let storage = open_storage(config).await?;
    storage.close().await?;
    info!(path = %config.storage.database_path, "database migrated");
    Ok(())
}

#[cfg(feature = "gemini")]
fn describer(
    config: &BazaarConfig,
) -> Result<Option<Arc<dyn DescriptionAdapter + Send + Sync>>, BazaarError> {
    Ok(bazaar_gemini::GeminiDescriber::from_config(&config.gemini)?
        .map(|d| Arc::new(d) as Arc<dyn DescriptionAdapter + Send + Sync>))
}

#[cfg(not(feature = "gemini"))]
fn describer(
    _config: &BazaarConfig,
) -> Result<Option<Arc<dyn DescriptionAdapter + Send + Sync>>, BazaarError> {
    info!("built without Gemini support; description generation disabled");
    Ok(None)
}

#[cfg(feature = "prometheus")]
fn metrics_renderer() -> Option<Arc<dyn Fn() -> String + Send + Sync>> {
    match bazaar_prometheus::PrometheusAdapter::new() {
        Ok(adapter) => {
            let adapter = Arc::new(adapter);
            Some(Arc::new(move || adapter.render()))
        }
        Err(e) => {
            warn!(error = %e, "prometheus recorder unavailable; /metrics disabled");
            None
        }
    }
}

#[cfg(not(feature = "prometheus"))]
fn metrics_renderer() -> Option<Arc<dyn Fn() -> String + Send + Sync>> {
    None
}

#[cfg(not(target_env = "msvc"))]
fn log_allocator_stats() {
    let _ = tikv_jemalloc_ctl::epoch::advance();
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
    info!(
        allocated_mb = allocated / (1024 * 1024),
        resident_mb = resident / (1024 * 1024),
        "allocator stats at shutdown"
    );
}

#[cfg(target_env = "msvc")]
fn log_allocator_stats() {}

/// Run the HTTP API until SIGINT/SIGTERM.
pub async fn run_serve(config: BazaarConfig) -> Result<(), BazaarError> {
    let storage = open_storage(&config).await?;
    info!(path = %config.storage.database_path, "storage ready");

    let identity = Arc::new(JwtIdentityVerifier::from_config(&config.auth)?);
    let media = Arc::new(LocalMediaStore::from_config(&config.media));
    match media.health_check().await? {
        bazaar_core::HealthStatus::Healthy => {}
        status => warn!(?status, root = %config.media.root_dir, "media store not ready"),
    }

    let market = Arc::new(Marketplace::new(
        storage.clone(),
        media.clone(),
        describer(&config)?,
        config.market.clone(),
    ));
    info!(
        descriptions = market.has_describer(),
        edit_after_sale = config.market.allow_edit_after_sale,
        "marketplace ready"
    );

    let state = GatewayState {
        market,
        identity,
        media_files: Some(media),
        health: HealthState::new(metrics_renderer()),
    };

    let cancel = shutdown::install_signal_handler();
    let served = start_server(&config.server, state, cancel).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to checkpoint database on shutdown");
    }
    log_allocator_stats();
    served?;

    info!("bazaar serve shutdown complete");
    Ok(())
}
