use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kedai_core::CheckoutError;
use serde_json::json;

/// Message returned for every failed checkout. Details stay in the server log.
pub const GENERIC_ERROR: &str = "internal error";

#[derive(Debug)]
pub enum AppError {
    Checkout(CheckoutError),
    NotFoundError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Checkout(CheckoutError::Gateway(err)) => {
                tracing::error!("Checkout failed at the payment gateway: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string())
            }
            AppError::Checkout(err) => {
                tracing::warn!("Checkout rejected: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string())
            }
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        Self::Checkout(err)
    }
}
