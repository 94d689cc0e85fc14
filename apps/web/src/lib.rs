//! # kasir-web: HTTP Server for Kasir POS
//!
//! Server-rendered sale entry for a single store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          kasir-web                                      │
//! │                                                                         │
//! │  main.rs ── config ── tracing ── Database::new ── create_router        │
//! │                                                     │                   │
//! │   ┌─────────────┐   ┌──────────────┐   ┌───────────┴──┐                │
//! │   │  routes/    │──►│  form.rs     │──►│ SaleRecorder │ (kasir-db)     │
//! │   │  handlers   │   │  items[i][…] │   └──────────────┘                │
//! │   └──────┬──────┘   └──────────────┘                                   │
//! │          ▼                                                              │
//! │   ┌─────────────┐                                                      │
//! │   │  views/     │  HTML strings, escaped                               │
//! │   └─────────────┘                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod routes;
pub mod state;
pub mod views;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::WebError;
pub use state::AppState;

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,kasir_web=debug,kasir_db=debug,tower_http=debug,sqlx=warn";

/// Builds the full application router with middleware and state.
pub fn create_router(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
