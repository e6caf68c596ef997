//! Checkout validation endpoint.
//!
//! Runs the availability guard over the requested cart. A conflict is a
//! normal 409 response with per-line detail, never a 5xx; downstream
//! checkout creation is the caller's next step after a 200.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::instrument;

use crate::cache::CartLine;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

/// `POST /checkout/validate` - availability guard over the cart.
///
/// Returns 200 with `{ok: true}` when every line can be satisfied, or
/// 409 with the per-line conflict list when any line would oversell.
#[instrument(skip(state, request), fields(lines = request.lines.len()))]
pub async fn validate_checkout(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Response> {
    if request.lines.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let report = state.cache().check_availability(&request.lines).await?;

    let status = if report.ok {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };

    Ok((status, Json(report)).into_response())
}
