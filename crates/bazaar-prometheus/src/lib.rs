// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Marketplace counters and their Prometheus exporter.
//!
//! The logic layer records through the helpers in [`recording`] whether or
//! not an exporter is installed. The binary installs [`PrometheusAdapter`]
//! at startup and the gateway serves its text output at `/metrics`.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use bazaar_core::BazaarError;
use bazaar_core::traits::PluginAdapter;
use bazaar_core::types::{AdapterType, HealthStatus};

pub use recording::{
    PurchaseOutcome, record_ai_generation, record_like_toggled, record_listing_created,
    record_message_sent, record_purchase,
};

/// Process-global Prometheus recorder.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Install the recorder and describe the marketplace counters.
    ///
    /// Fails when another recorder already owns the process.
    pub fn new() -> Result<Self, BazaarError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            BazaarError::Internal(format!("cannot install prometheus recorder: {e}"))
        })?;
        recording::register_metrics();
        tracing::info!("prometheus recorder installed");
        Ok(Self { handle })
    }

    /// Current counter values in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BazaarError> {
        Ok(())
    }
}
