//! Shared state handed to every handler.

use std::sync::Arc;

use kasir_db::Database;

use crate::config::AppConfig;

/// Application state.
///
/// Cloned per request; both fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}
