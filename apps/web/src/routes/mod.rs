//! # Routes
//!
//! ```text
//! GET  /               → 303 /sales
//! GET  /sales          → recent sales (banner when ?success=1)
//! GET  /sales/create   → sale entry form
//! POST /sales/create   → record sale → 303 /sales?success=1
//!                                      or form again (422 / 500)
//! GET  /health         → JSON status
//! ```

pub mod health;
pub mod sales;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Builds the application routes (without middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/sales", get(sales::index))
        .route("/sales/create", get(sales::create_form).post(sales::create_submit))
        .route("/health", get(health::health))
}

async fn root() -> Redirect {
    Redirect::to("/sales")
}
