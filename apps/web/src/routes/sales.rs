//! # Sale Handlers
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /sales/create                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleForm::from_pairs ──► to_new_sale ──► SaleRecorder::record         │
//! │                               │                  │                      │
//! │                      Err ─────┴────────┬─────────┤ Ok                   │
//! │                                        ▼         ▼                      │
//! │                     form + message (422/500)   303 /sales?success=1    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::info;

use crate::error::{WebError, WebResult};
use crate::form::SaleForm;
use crate::state::AppState;
use crate::views::sale_form::{self, SaleFormPage};
use crate::views::sale_list;

/// Where a successful submit lands.
pub const SUCCESS_REDIRECT: &str = "/sales?success=1";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub success: Option<String>,
}

/// `GET /sales`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> WebResult<Html<String>> {
    let sales = state.db.sales().list_recent(state.config.recent_sales_limit).await?;
    let success = query.success.as_deref() == Some("1");

    Ok(Html(sale_list::render(&state.config, &sales, success)))
}

/// `GET /sales/create`
pub async fn create_form(State(state): State<AppState>) -> WebResult<Html<String>> {
    Ok(Html(render_form(&state, None, None).await?))
}

/// `POST /sales/create`
pub async fn create_submit(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = SaleForm::from_pairs(pairs);

    let result = match form.to_new_sale() {
        Ok(sale) => state.db.recorder().record(sale).await.map_err(WebError::from),
        Err(err) => Err(err),
    };

    match result {
        Ok(recorded) => {
            info!(invoice_number = %recorded.invoice_number, "Sale submitted");
            Redirect::to(SUCCESS_REDIRECT).into_response()
        }
        Err(err) => {
            let status = err.status();
            let message = err.user_message();

            match render_form(&state, Some(&message), Some(&form)).await {
                Ok(html) => (status, Html(html)).into_response(),
                Err(render_err) => render_err.into_response(),
            }
        }
    }
}

/// Loads what the form lists and renders it.
async fn render_form(
    state: &AppState,
    error: Option<&str>,
    submitted: Option<&SaleForm>,
) -> WebResult<String> {
    let products = state.db.products().list_in_stock().await?;
    let customers = state.db.customers().list().await?;

    Ok(sale_form::render(&SaleFormPage {
        config: &state.config,
        products: &products,
        customers: &customers,
        error,
        submitted,
    }))
}
