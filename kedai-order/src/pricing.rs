use crate::checkout::{CartItem, CheckoutRequest};
use crate::models::{LineItem, Order, OrderId, Quote, Selection};
use kedai_catalog::{Catalog, ShippingTable};
use kedai_core::{CheckoutError, CoreResult};
use kedai_shared::Amount;
use serde_json::Number;

/// Price a cart.
///
/// Selections with a zero quantity are dropped, every other selection becomes
/// a line item as-is, and one shipping line item (quantity 1) is appended.
/// Pure: the same inputs always give the same order.
///
/// Fails with `InvalidDestination` when the destination is not in the table
/// and with `EmptyCart` when no selection has a positive quantity, so a
/// shipping-only transaction is never produced.
pub fn compute_order(
    order_id: OrderId,
    selections: &[Selection],
    destination: &str,
    shipping: &ShippingTable,
) -> CoreResult<Order> {
    let mut line_items = Vec::with_capacity(selections.len() + 1);
    let mut subtotal: Amount = 0;

    for selection in selections.iter().filter(|s| s.quantity > 0) {
        let item = LineItem {
            id: selection.id.clone(),
            name: selection.name.clone(),
            unit_price: selection.unit_price,
            quantity: selection.quantity,
        };
        subtotal = item
            .amount()
            .and_then(|amount| subtotal.checked_add(amount))
            .ok_or_else(|| CheckoutError::AmountOverflow(item.id.clone()))?;
        line_items.push(item);
    }

    let shipping_cost = shipping
        .cost(destination)
        .ok_or_else(|| CheckoutError::InvalidDestination(destination.to_string()))?;

    if line_items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let gross_amount = subtotal
        .checked_add(shipping_cost)
        .ok_or_else(|| CheckoutError::AmountOverflow("shipping".to_string()))?;
    line_items.push(LineItem::shipping(destination, shipping_cost));

    Ok(Order {
        order_id,
        line_items,
        gross_amount,
    })
}

/// Display totals. Unlike [`compute_order`] this never fails: an empty cart
/// quotes just the shipping cost, and amounts saturate instead of overflowing.
pub fn quote(selections: &[Selection], shipping_cost: Amount) -> Quote {
    let product_total = selections
        .iter()
        .map(|s| s.unit_price.saturating_mul(Amount::from(s.quantity)))
        .fold(0, Amount::saturating_add);

    Quote {
        product_total,
        shipping_cost,
        grand_total: product_total.saturating_add(shipping_cost),
    }
}

/// Reprices client carts against the server catalog before anything is sent
/// to the gateway. Client names, prices and totals are never trusted.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: Catalog,
    shipping: ShippingTable,
}

impl PricingEngine {
    pub fn new(catalog: Catalog, shipping: ShippingTable) -> Self {
        Self { catalog, shipping }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shipping(&self) -> &ShippingTable {
        &self.shipping
    }

    /// Turn submitted cart rows into trusted selections.
    pub fn reprice(&self, items: &[CartItem]) -> CoreResult<Vec<Selection>> {
        let mut selections: Vec<Selection> = Vec::with_capacity(items.len());

        for item in items {
            if selections.iter().any(|s| s.id == item.id) {
                return Err(CheckoutError::MalformedRequest(format!(
                    "item {} appears more than once",
                    item.id
                )));
            }

            let quantity = whole_number(&item.quantity)
                .and_then(|q| u32::try_from(q).ok())
                .ok_or_else(|| CheckoutError::InvalidQuantity {
                    id: item.id.clone(),
                    value: item.quantity.to_string(),
                })?;

            let product = self
                .catalog
                .get(&item.id)
                .ok_or_else(|| CheckoutError::UnknownProduct(item.id.clone()))?;

            if let Some(submitted) = &item.price {
                ensure_price(&item.id, submitted, product.price)?;
            }

            selections.push(Selection {
                id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
            });
        }

        Ok(selections)
    }

    /// Reprice a whole checkout payload and compute the order.
    pub fn price_checkout(&self, request: &CheckoutRequest) -> CoreResult<Order> {
        let order_id = OrderId::parse(request.order_id.clone())?;
        let selections = self.reprice(&request.items)?;

        if let Some(submitted) = &request.shipping_cost {
            let expected = self
                .shipping
                .cost(&request.shipping_destination)
                .ok_or_else(|| {
                    CheckoutError::InvalidDestination(request.shipping_destination.clone())
                })?;
            ensure_price("shipping", submitted, expected)?;
        }

        compute_order(
            order_id,
            &selections,
            &request.shipping_destination,
            &self.shipping,
        )
    }
}

/// Non-negative integral JSON number. `2` and `2.0` qualify, `-1` and `1.5` do not.
fn whole_number(n: &Number) -> Option<u64> {
    if let Some(v) = n.as_u64() {
        return Some(v);
    }
    let f = n.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn ensure_price(id: &str, submitted: &Number, expected: Amount) -> CoreResult<()> {
    if whole_number(submitted) == Some(expected) {
        Ok(())
    } else {
        Err(CheckoutError::PriceMismatch {
            id: id.to_string(),
            submitted: submitted.to_string(),
            expected,
        })
    }
}
