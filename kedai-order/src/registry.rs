use crate::models::OrderId;
use chrono::{DateTime, TimeDelta, Utc};
use kedai_core::{CheckoutError, CoreResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Snap tokens expire after a day by default, after which the gateway
/// itself refuses a reused order id.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Guards against submitting the same order id to the gateway twice.
///
/// An id is claimed before the gateway call. The returned [`OrderClaim`]
/// releases the id when dropped unless it was committed, so a failed or
/// cancelled call leaves the id free for a retry. Committed ids are forgotten
/// once they are older than the retention window. The lock is never held
/// across an await.
#[derive(Debug)]
pub struct SubmittedOrders {
    ids: Mutex<HashMap<OrderId, DateTime<Utc>>>,
    retention: TimeDelta,
}

impl Default for SubmittedOrders {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl SubmittedOrders {
    pub fn new(retention: Duration) -> Self {
        Self {
            ids: Mutex::new(HashMap::new()),
            retention: TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn claim(&self, order_id: &OrderId) -> CoreResult<OrderClaim<'_>> {
        self.claim_at(order_id, Utc::now())
    }

    fn claim_at(&self, order_id: &OrderId, now: DateTime<Utc>) -> CoreResult<OrderClaim<'_>> {
        let mut ids = self.lock();
        let retention = self.retention;
        ids.retain(|_, claimed_at| now.signed_duration_since(*claimed_at) < retention);

        if ids.contains_key(order_id) {
            return Err(CheckoutError::DuplicateOrder(order_id.to_string()));
        }
        ids.insert(order_id.clone(), now);

        Ok(OrderClaim {
            orders: self,
            order_id: order_id.clone(),
            committed: false,
        })
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.lock().contains_key(order_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, order_id: &OrderId) {
        self.lock().remove(order_id);
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<OrderId, DateTime<Utc>>> {
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A pending claim on an order id. Dropping it without [`commit`](Self::commit)
/// releases the id.
#[derive(Debug)]
#[must_use = "dropping the claim releases the order id"]
pub struct OrderClaim<'a> {
    orders: &'a SubmittedOrders,
    order_id: OrderId,
    committed: bool,
}

impl OrderClaim<'_> {
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Keep the id claimed; the gateway has issued a token for it.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for OrderClaim<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!("Releasing claim on order {}", self.order_id);
            self.orders.release(&self.order_id);
        }
    }
}
