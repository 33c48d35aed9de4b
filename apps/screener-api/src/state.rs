use std::sync::Arc;

use screener_service::ScreenerService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ScreenerService>,
}
impl AppState {
	pub fn new(config: screener_config::Config) -> color_eyre::Result<Self> {
		let service = ScreenerService::connect(config)?;

		tracing::info!(
			collection = %service.cfg.storage.qdrant.collection,
			vector_dim = service.cfg.storage.qdrant.vector_dim,
			"Search backend configured."
		);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn from_service(service: ScreenerService) -> Self {
		Self { service: Arc::new(service) }
	}
}
