use crate::config::ApiConfig;
use intake_core::IntakeStore;
use std::sync::Arc;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<dyn IntakeStore>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn IntakeStore>, config: ApiConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
