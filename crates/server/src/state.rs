use std::sync::Arc;

use melodine_core::{Aggregator, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(config: Config, aggregator: Arc<Aggregator>) -> Self {
        Self { config, aggregator }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
