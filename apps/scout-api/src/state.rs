use std::sync::Arc;

use scout_service::{Providers, ScoutService};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ScoutService>,
}
impl AppState {
	pub fn new(config: scout_config::Config) -> Self {
		Self { service: Arc::new(ScoutService::new(config)) }
	}

	pub fn with_providers(config: scout_config::Config, providers: Providers) -> Self {
		Self { service: Arc::new(ScoutService::with_providers(config, providers)) }
	}
}
