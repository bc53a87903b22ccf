use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use kedai_api::{app, AppState};
use kedai_core::PaymentGateway;
use kedai_order::{MockPaymentGateway, PricingEngine};
use kedai_store::{app_config::Config, GatewayMode, SnapGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kedai_api=debug,kedai_order=debug,kedai_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Kedai API on port {}", config.server.port);

    let catalog = config.catalog().context("Invalid catalog")?;
    let shipping = config.shipping_table().context("Invalid shipping table")?;
    tracing::info!(
        "Loaded {} products and {} shipping destinations",
        catalog.products().len(),
        shipping.options().len()
    );

    let gateway: Arc<dyn PaymentGateway> = match config.gateway.mode {
        GatewayMode::Snap => Arc::new(
            SnapGateway::from_config(&config.gateway).context("Failed to create Snap gateway")?,
        ),
        GatewayMode::Mock => {
            tracing::warn!("Using the mock payment gateway; no real transactions will be created");
            Arc::new(MockPaymentGateway::new())
        }
    };

    let app_state = AppState::new(
        PricingEngine::new(catalog, shipping),
        gateway,
        config.checkout.duplicate_window(),
    );
    let app = app(app_state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
