pub mod payment;

use kedai_shared::Amount;

pub use payment::{GatewayError, PaymentCallbacks, PaymentGateway, PaymentOutcome};

/// Everything that can stop a checkout, from request parsing down to the gateway call.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("Unknown shipping destination: {0}")]
    InvalidDestination(String),
    #[error("Cart has no product with a positive quantity")]
    EmptyCart,
    #[error("Invalid quantity for {id}: {value}")]
    InvalidQuantity { id: String, value: String },
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    #[error("Price mismatch for {id}: submitted {submitted}, catalog {expected}")]
    PriceMismatch {
        id: String,
        submitted: String,
        expected: Amount,
    },
    #[error("Amount overflow while pricing {0}")]
    AmountOverflow(String),
    #[error("Order {0} was already submitted")]
    DuplicateOrder(String),
    #[error("A checkout is already in progress")]
    CheckoutInProgress,
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

pub type CoreResult<T> = Result<T, CheckoutError>;
