use std::sync::Arc;
use kedai_core::PaymentGateway;
use kedai_order::{CheckoutService, PaymentOrchestrator, PricingEngine, SubmittedOrders};
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PricingEngine>,
    pub checkout: Arc<CheckoutService>,
}

impl AppState {
    pub fn new(
        engine: PricingEngine,
        gateway: Arc<dyn PaymentGateway>,
        duplicate_window: Duration,
    ) -> Self {
        let engine = Arc::new(engine);
        let checkout = CheckoutService::new(
            engine.clone(),
            PaymentOrchestrator::new(gateway),
            SubmittedOrders::new(duplicate_window),
        );

        Self {
            engine,
            checkout: Arc::new(checkout),
        }
    }
}
