pub mod app_config;
pub mod snap;

pub use app_config::{Config, GatewayConfig, GatewayMode};
pub use snap::SnapGateway;
