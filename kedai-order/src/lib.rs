pub mod models;
pub mod pricing;
pub mod checkout;
pub mod orchestrator;
pub mod registry;
pub mod storefront;

pub use models::{LineItem, Order, OrderId, Quote, Selection, SHIPPING_ITEM_ID};
pub use pricing::{compute_order, quote, PricingEngine};
pub use checkout::{CartItem, CheckoutRequest, CheckoutService};
pub use orchestrator::{MockPaymentGateway, PaymentOrchestrator};
pub use registry::{OrderClaim, SubmittedOrders, DEFAULT_RETENTION};
pub use storefront::{parse_quantity, Notice, StorefrontAction, StorefrontState};
