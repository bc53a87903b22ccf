use chrono::Utc;
use kedai_core::{CheckoutError, CoreResult};
use kedai_shared::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Line item id reserved for the shipping surcharge.
pub const SHIPPING_ITEM_ID: &str = "shipping";

/// Merchant-side order reference sent to the gateway as `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

impl OrderId {
    /// Longest order id the gateway accepts.
    pub const MAX_LEN: usize = 50;

    pub fn parse(raw: impl Into<String>) -> CoreResult<Self> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > Self::MAX_LEN {
            return Err(CheckoutError::MalformedRequest(format!(
                "orderId must be 1 to {} characters",
                Self::MAX_LEN
            )));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')))
        {
            return Err(CheckoutError::MalformedRequest(format!(
                "orderId contains unsupported character {:?}",
                bad
            )));
        }
        Ok(Self(raw))
    }

    /// Time-based id, unique enough for a single storefront session.
    pub fn generate() -> Self {
        Self(format!("order-{}", Utc::now().timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OrderId {
    type Error = CheckoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

/// A product row as the shopper sees it: catalog data plus the chosen quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub id: String,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Amount,
    pub quantity: u32,
}

/// The unit the payment gateway consumes. Never mutated after pricing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Amount,
    pub quantity: u32,
}

impl LineItem {
    pub fn shipping(destination: &str, cost: Amount) -> Self {
        Self {
            id: SHIPPING_ITEM_ID.to_string(),
            name: format!("Shipping to {}", destination),
            unit_price: cost,
            quantity: 1,
        }
    }

    pub fn is_shipping(&self) -> bool {
        self.id == SHIPPING_ITEM_ID
    }

    /// `unit_price × quantity`, or `None` on overflow.
    pub fn amount(&self) -> Option<Amount> {
        self.unit_price.checked_mul(Amount::from(self.quantity))
    }
}

/// A priced checkout attempt. Created once per attempt and never reused.
///
/// `gross_amount` always equals the sum of `unit_price × quantity` over
/// `line_items`, which is what the gateway validates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub order_id: OrderId,
    pub line_items: Vec<LineItem>,
    pub gross_amount: Amount,
}

impl Order {
    pub fn shipping_item(&self) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.is_shipping())
    }

    pub fn shipping_cost(&self) -> Amount {
        self.shipping_item().map(|item| item.unit_price).unwrap_or(0)
    }

    pub fn product_subtotal(&self) -> Amount {
        self.gross_amount - self.shipping_cost()
    }
}

/// Totals shown next to the cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub product_total: Amount,
    pub shipping_cost: Amount,
    pub grand_total: Amount,
}
