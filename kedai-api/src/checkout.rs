use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use kedai_core::{payment::TransactionResponse, CheckoutError};
use serde_json::Value;
use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/checkout", post(create_checkout))
}

/// POST /checkout
/// Reprice the submitted cart and create a gateway transaction for it.
/// Answers with the gateway response verbatim (it carries the widget token).
async fn create_checkout(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TransactionResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| CheckoutError::MalformedRequest(e.body_text()))?;

    let response = state.checkout.checkout_value(payload).await?;

    Ok(Json(response))
}
