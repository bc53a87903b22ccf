//! Midtrans Snap transaction API.
//!
//! Creates a transaction and returns the token the hosted Snap widget needs.
//! Docs: https://docs.midtrans.com/reference/backend-integration

use crate::app_config::GatewayConfig;
use async_trait::async_trait;
use kedai_core::payment::{GatewayError, PaymentGateway, TransactionRequest, TransactionResponse};
use kedai_shared::Masked;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

pub const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";
pub const PRODUCTION_BASE_URL: &str = "https://app.midtrans.com";
const TRANSACTIONS_PATH: &str = "/snap/v1/transactions";

#[derive(Debug, Deserialize)]
struct SnapErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
}

#[derive(Clone)]
pub struct SnapGateway {
    client: reqwest::Client,
    endpoint: String,
    server_key: Masked<String>,
}

impl SnapGateway {
    pub fn new(
        base_url: &str,
        server_key: Masked<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TRANSACTIONS_PATH),
            server_key,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = config.base_url();
        info!("Snap gateway endpoint: {}{}", base_url, TRANSACTIONS_PATH);
        Self::new(
            base_url,
            config.server_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentGateway for SnapGateway {
    fn name(&self) -> &'static str {
        "snap"
    }

    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, GatewayError> {
        // Basic auth: server key as username, empty password
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(self.server_key.expose(), Some(""))
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            let messages = serde_json::from_slice::<SnapErrorBody>(&body)
                .map(|b| b.error_messages)
                .unwrap_or_default();
            warn!(
                "Snap rejected order {} with HTTP {}",
                request.transaction_details.order_id, status
            );
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                messages,
            });
        }

        serde_json::from_slice::<TransactionResponse>(&body)
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
