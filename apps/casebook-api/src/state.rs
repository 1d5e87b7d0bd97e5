use std::sync::Arc;

use casebook_service::CasebookService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CasebookService>,
}
impl AppState {
	pub async fn new(config: casebook_config::Config) -> color_eyre::Result<Self> {
		let service = CasebookService::connect(config).await?;

		Ok(Self { service: Arc::new(service) })
	}
}
