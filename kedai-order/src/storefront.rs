//! Shopper-side state of the storefront page.
//!
//! The page keeps one [`StorefrontState`] per session and replaces it with
//! the result of [`StorefrontState::apply`] on every user or widget event.
//! Transitions never mutate the state they are applied to, so totals can be
//! recomputed from any snapshot with the same pricing code the server uses.

use crate::checkout::{CartItem, CheckoutRequest};
use crate::models::{OrderId, Quote, Selection};
use crate::pricing;
use kedai_catalog::{Catalog, ShippingTable};
use kedai_core::{CheckoutError, CoreResult, PaymentOutcome};
use kedai_shared::Amount;
use serde_json::Number;
use std::sync::Arc;

/// User-facing message left by the last terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    PaymentSucceeded,
    PaymentPending,
    PaymentFailed,
    PaymentAbandoned,
    TokenUnavailable,
    RequestFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::PaymentSucceeded => "Payment successful!",
            Notice::PaymentPending => "Payment is pending.",
            Notice::PaymentFailed => "Payment failed.",
            Notice::PaymentAbandoned => "The payment window was closed before the payment was completed.",
            Notice::TokenUnavailable => "Could not obtain a payment token.",
            Notice::RequestFailed => "Something went wrong while processing the payment.",
        }
    }
}

impl From<&PaymentOutcome> for Notice {
    fn from(outcome: &PaymentOutcome) -> Self {
        match outcome {
            PaymentOutcome::Succeeded(_) => Notice::PaymentSucceeded,
            PaymentOutcome::Pending(_) => Notice::PaymentPending,
            PaymentOutcome::Failed(_) => Notice::PaymentFailed,
            PaymentOutcome::Abandoned => Notice::PaymentAbandoned,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorefrontAction {
    SetQuantity { id: String, quantity: u32 },
    SelectDestination(String),
    /// Buy button pressed.
    CheckoutStarted,
    /// The endpoint answered with a token and the payment widget is open.
    TokenReceived,
    /// The endpoint answered without a token.
    TokenUnavailable,
    /// The endpoint could not be reached.
    RequestFailed,
    /// The payment widget reported how it finished.
    PaymentSettled(PaymentOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontState {
    shipping: Arc<ShippingTable>,
    pub products: Vec<Selection>,
    pub destination: String,
    pub shipping_cost: Amount,
    /// Set while a checkout request is in flight; disables the buy button.
    pub processing: bool,
    pub notice: Option<Notice>,
}

impl StorefrontState {
    /// Fresh session: every quantity zero, first shipping option selected.
    pub fn new(catalog: &Catalog, shipping: Arc<ShippingTable>) -> Self {
        let products = catalog
            .products()
            .iter()
            .map(|p| Selection {
                id: p.id.clone(),
                name: p.name.clone(),
                unit_price: p.price,
                quantity: 0,
            })
            .collect();
        let default = shipping.default_option().clone();

        Self {
            shipping,
            products,
            destination: default.destination,
            shipping_cost: default.cost,
            processing: false,
            notice: None,
        }
    }

    pub fn apply(&self, action: StorefrontAction) -> CoreResult<Self> {
        let mut next = self.clone();

        match action {
            StorefrontAction::SetQuantity { id, quantity } => {
                let product = next
                    .products
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(CheckoutError::UnknownProduct(id))?;
                product.quantity = quantity;
            }
            StorefrontAction::SelectDestination(destination) => {
                let cost = self
                    .shipping
                    .cost(&destination)
                    .ok_or_else(|| CheckoutError::InvalidDestination(destination.clone()))?;
                next.destination = destination;
                next.shipping_cost = cost;
            }
            StorefrontAction::CheckoutStarted => {
                if self.processing {
                    return Err(CheckoutError::CheckoutInProgress);
                }
                if self.quote().product_total == 0 {
                    return Err(CheckoutError::EmptyCart);
                }
                next.processing = true;
                next.notice = None;
            }
            StorefrontAction::TokenReceived => {
                next.processing = false;
            }
            StorefrontAction::TokenUnavailable => {
                next.processing = false;
                next.notice = Some(Notice::TokenUnavailable);
            }
            StorefrontAction::RequestFailed => {
                next.processing = false;
                next.notice = Some(Notice::RequestFailed);
            }
            StorefrontAction::PaymentSettled(outcome) => {
                next.processing = false;
                next.notice = Some(Notice::from(&outcome));
            }
        }

        Ok(next)
    }

    pub fn quote(&self) -> Quote {
        pricing::quote(&self.products, self.shipping_cost)
    }

    /// Payload for `POST /checkout`. Every product row is sent, including zero quantities.
    pub fn checkout_request(&self, order_id: &OrderId) -> CoreResult<CheckoutRequest> {
        if self.quote().product_total == 0 {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(CheckoutRequest {
            order_id: order_id.to_string(),
            items: self
                .products
                .iter()
                .map(|p| CartItem {
                    id: p.id.clone(),
                    name: Some(p.name.clone()),
                    price: Some(Number::from(p.unit_price)),
                    quantity: Number::from(p.quantity),
                })
                .collect(),
            shipping_cost: Some(Number::from(self.shipping_cost)),
            shipping_destination: self.destination.clone(),
        })
    }
}

/// Read a quantity typed into the page. A cleared field counts as zero;
/// anything that is not a non-negative integer is rejected.
pub fn parse_quantity(id: &str, raw: &str) -> CoreResult<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u32>().map_err(|_| CheckoutError::InvalidQuantity {
        id: id.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kedai_catalog::{Product, ShippingOption};
    use kedai_core::payment::ChannelCallbacks;
    use kedai_core::PaymentCallbacks;
    use serde_json::json;

    fn state() -> StorefrontState {
        let catalog = Catalog::new(vec![
            Product::new("susu-loli", "Susu Loli", 17000),
            Product::new("susu-neesaan", "Susu Neesaan", 25000),
            Product::new("susu-mommy", "Susu Mommy", 50000),
        ])
        .unwrap();
        let shipping = ShippingTable::new(vec![
            ShippingOption::new("Jakarta", 9000),
            ShippingOption::new("Bandung", 12000),
            ShippingOption::new("Palembang", 20000),
        ])
        .unwrap();
        StorefrontState::new(&catalog, Arc::new(shipping))
    }

    fn set(id: &str, quantity: u32) -> StorefrontAction {
        StorefrontAction::SetQuantity { id: id.into(), quantity }
    }

    #[test]
    fn test_initial_state() {
        let s = state();
        assert_eq!(s.destination, "Jakarta");
        assert_eq!(s.shipping_cost, 9000);
        assert!(s.products.iter().all(|p| p.quantity == 0));
        assert_eq!(s.quote().grand_total, 9000);
    }

    #[test]
    fn test_transitions_do_not_touch_previous_state() {
        let before = state();
        let after = before.apply(set("susu-loli", 2)).unwrap();

        assert_eq!(before.products[0].quantity, 0);
        assert_eq!(after.products[0].quantity, 2);
        assert_eq!(after.quote().product_total, 34000);
    }

    #[test]
    fn test_select_destination_updates_cost() {
        let s = state()
            .apply(set("susu-loli", 2))
            .unwrap()
            .apply(StorefrontAction::SelectDestination("Bandung".into()))
            .unwrap();

        assert_eq!(s.shipping_cost, 12000);
        assert_eq!(s.quote().grand_total, 46000);
    }

    #[test]
    fn test_unknown_destination_is_an_error() {
        let s = state();
        let err = s
            .apply(StorefrontAction::SelectDestination("Surabaya".into()))
            .unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidDestination(_)));
        assert_eq!(s.shipping_cost, 9000);
    }

    #[test]
    fn test_unknown_product_is_an_error() {
        let err = state().apply(set("susu-kuda", 1)).unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownProduct(_)));
    }

    #[test]
    fn test_checkout_requires_a_product() {
        let err = state().apply(StorefrontAction::CheckoutStarted).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_processing_flag_blocks_resubmission() {
        let s = state()
            .apply(set("susu-mommy", 1))
            .unwrap()
            .apply(StorefrontAction::CheckoutStarted)
            .unwrap();
        assert!(s.processing);

        let err = s.apply(StorefrontAction::CheckoutStarted).unwrap_err();
        assert!(matches!(err, CheckoutError::CheckoutInProgress));

        let s = s.apply(StorefrontAction::TokenReceived).unwrap();
        assert!(!s.processing);
        assert_eq!(s.notice, None);
    }

    #[test]
    fn test_failed_request_clears_processing() {
        let s = state()
            .apply(set("susu-mommy", 1))
            .unwrap()
            .apply(StorefrontAction::CheckoutStarted)
            .unwrap()
            .apply(StorefrontAction::RequestFailed)
            .unwrap();

        assert!(!s.processing);
        assert_eq!(s.notice, Some(Notice::RequestFailed));
    }

    #[tokio::test]
    async fn test_widget_outcomes_arrive_over_channel() {
        let (callbacks, mut rx) = ChannelCallbacks::channel();
        let mut s = state()
            .apply(set("susu-loli", 1))
            .unwrap()
            .apply(StorefrontAction::CheckoutStarted)
            .unwrap()
            .apply(StorefrontAction::TokenReceived)
            .unwrap();

        callbacks.on_pending(json!({"transaction_status": "pending"}));
        let outcome = rx.recv().await.unwrap();
        s = s.apply(StorefrontAction::PaymentSettled(outcome)).unwrap();
        assert_eq!(s.notice, Some(Notice::PaymentPending));

        callbacks.on_close();
        let outcome = rx.recv().await.unwrap();
        s = s.apply(StorefrontAction::PaymentSettled(outcome)).unwrap();
        assert_eq!(s.notice, Some(Notice::PaymentAbandoned));
        assert_eq!(
            s.notice.map(|n| n.message()),
            Some("The payment window was closed before the payment was completed.")
        );
    }

    #[test]
    fn test_checkout_request_payload() {
        let s = state()
            .apply(set("susu-loli", 2))
            .unwrap()
            .apply(StorefrontAction::SelectDestination("Bandung".into()))
            .unwrap();
        let request = s.checkout_request(&OrderId::parse("order-9").unwrap()).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["orderId"], "order-9");
        assert_eq!(value["items"].as_array().unwrap().len(), 3);
        assert_eq!(value["items"][0]["quantity"], 2);
        assert_eq!(value["shippingCost"], 12000);
        assert_eq!(value["shippingDestination"], "Bandung");
    }

    #[test]
    fn test_checkout_request_rejects_empty_cart() {
        let err = state().checkout_request(&OrderId::generate()).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("a", "").unwrap(), 0);
        assert_eq!(parse_quantity("a", " 3 ").unwrap(), 3);
        assert!(matches!(
            parse_quantity("a", "-1"),
            Err(CheckoutError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            parse_quantity("a", "1.5"),
            Err(CheckoutError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            parse_quantity("a", "dua"),
            Err(CheckoutError::InvalidQuantity { .. })
        ));
    }
}
