use crate::orchestrator::PaymentOrchestrator;
use crate::pricing::PricingEngine;
use crate::registry::SubmittedOrders;
use kedai_core::payment::TransactionResponse;
use kedai_core::{CheckoutError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::sync::Arc;

/// One cart row as submitted by the storefront. Only `id` and `quantity` are
/// used for pricing; `name` and `price` are informational and `price` is
/// checked against the catalog when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    pub quantity: Number,
}

/// Body of `POST /checkout`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub order_id: String,
    pub items: Vec<CartItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<Number>,
    pub shipping_destination: String,
}

impl CheckoutRequest {
    pub fn from_value(value: Value) -> CoreResult<Self> {
        serde_json::from_value(value).map_err(|e| CheckoutError::MalformedRequest(e.to_string()))
    }
}

/// Server side of checkout: reprice, guard against duplicates, call the gateway once.
pub struct CheckoutService {
    engine: Arc<PricingEngine>,
    orchestrator: PaymentOrchestrator,
    submitted: SubmittedOrders,
}

impl CheckoutService {
    pub fn new(
        engine: Arc<PricingEngine>,
        orchestrator: PaymentOrchestrator,
        submitted: SubmittedOrders,
    ) -> Self {
        Self {
            engine,
            orchestrator,
            submitted,
        }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Validate a raw JSON payload and check out.
    pub async fn checkout_value(&self, payload: Value) -> CoreResult<TransactionResponse> {
        let request = CheckoutRequest::from_value(payload)?;
        self.checkout(&request).await
    }

    pub async fn checkout(&self, request: &CheckoutRequest) -> CoreResult<TransactionResponse> {
        let order = self.engine.price_checkout(request)?;

        // Released on drop, including when this future is cancelled mid-call
        let claim = self.submitted.claim(&order.order_id)?;

        let response = self.orchestrator.create_transaction(&order).await?;
        claim.commit();

        tracing::info!(
            "Checkout accepted for order {}: gross {} over {} line items",
            order.order_id,
            order.gross_amount,
            order.line_items.len()
        );
        Ok(response)
    }
}
