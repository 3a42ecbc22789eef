//! Gateway shared state.

use std::sync::Arc;

use voxtube_core::config::Config;
use voxtube_skill::Skill;

/// Read-only state shared by every request handler.
pub struct GatewayState {
    pub config: Arc<Config>,
    pub skill: Skill,
    #[cfg(feature = "metrics")]
    pub metrics: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl GatewayState {
    pub fn new(config: Arc<Config>, skill: Skill) -> Self {
        Self {
            config,
            skill,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Build the production skill from config.
    pub fn from_config(config: Arc<Config>) -> voxtube_core::error::Result<Self> {
        let skill = Skill::from_config(&config)?;
        Ok(Self::new(config, skill))
    }

    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, handle: metrics_exporter_prometheus::PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
