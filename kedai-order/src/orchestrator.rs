use crate::models::Order;
use async_trait::async_trait;
use kedai_core::payment::{
    CreditCard, GatewayError, ItemDetail, PaymentGateway, TransactionDetails, TransactionRequest,
    TransactionResponse,
};
use serde_json::Map;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shapes priced orders into gateway requests and hands them to the configured gateway.
#[derive(Clone)]
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub fn transaction_request(order: &Order) -> TransactionRequest {
        TransactionRequest {
            transaction_details: TransactionDetails {
                order_id: order.order_id.to_string(),
                gross_amount: order.gross_amount,
            },
            item_details: order
                .line_items
                .iter()
                .map(|item| ItemDetail {
                    id: item.id.clone(),
                    price: item.unit_price,
                    quantity: item.quantity,
                    name: item.name.clone(),
                })
                .collect(),
            credit_card: CreditCard { secure: true },
        }
    }

    /// Single gateway call for an order. No retries.
    pub async fn create_transaction(
        &self,
        order: &Order,
    ) -> Result<TransactionResponse, GatewayError> {
        let request = Self::transaction_request(order);
        tracing::debug!(
            "Creating {} transaction for order {} ({} items, gross {})",
            self.gateway.name(),
            order.order_id,
            request.item_details.len(),
            order.gross_amount
        );
        self.gateway.create_transaction(&request).await
    }
}

/// In-process gateway for local runs and tests. Records every request it sees.
#[derive(Default)]
pub struct MockPaymentGateway {
    requests: Mutex<Vec<TransactionRequest>>,
    failure: Option<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that is down: every call fails with `Unavailable`.
    pub fn failing(reason: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(reason.to_string()),
        }
    }

    pub async fn requests(&self) -> Vec<TransactionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, GatewayError> {
        self.requests.lock().await.push(request.clone());

        if let Some(reason) = &self.failure {
            return Err(GatewayError::Unavailable(reason.clone()));
        }

        // Same consistency check the real gateway performs
        let items_total = request
            .item_details
            .iter()
            .try_fold(0u64, |acc, item| {
                item.price
                    .checked_mul(u64::from(item.quantity))
                    .and_then(|amount| acc.checked_add(amount))
            });
        if items_total != Some(request.transaction_details.gross_amount) {
            return Err(GatewayError::Rejected {
                status: 400,
                messages: vec![
                    "transaction_details.gross_amount is not equal to the sum of item_details"
                        .to_string(),
                ],
            });
        }

        let token = format!("mock-token-{}", request.transaction_details.order_id);
        Ok(TransactionResponse {
            redirect_url: Some(format!("https://mock.gateway.local/snap/v2/vtweb/{}", token)),
            token,
            extra: Map::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItem, OrderId};

    fn order() -> Order {
        Order {
            order_id: OrderId::parse("order-7").unwrap(),
            line_items: vec![
                LineItem {
                    id: "susu-loli".into(),
                    name: "Susu Loli".into(),
                    unit_price: 17000,
                    quantity: 2,
                },
                LineItem::shipping("Bandung", 12000),
            ],
            gross_amount: 46000,
        }
    }

    #[test]
    fn test_transaction_request_shape() {
        let request = PaymentOrchestrator::transaction_request(&order());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["transaction_details"]["order_id"], "order-7");
        assert_eq!(value["transaction_details"]["gross_amount"], 46000);
        assert_eq!(value["credit_card"]["secure"], true);
        assert_eq!(value["item_details"][0]["price"], 17000);
        assert_eq!(value["item_details"][1]["id"], "shipping");
        assert_eq!(value["item_details"][1]["quantity"], 1);
    }

    #[tokio::test]
    async fn test_orchestrator_calls_gateway_once() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let orchestrator = PaymentOrchestrator::new(gateway.clone());

        let response = orchestrator.create_transaction(&order()).await.unwrap();

        assert_eq!(response.token, "mock-token-order-7");
        assert_eq!(gateway.calls().await, 1);
        assert_eq!(gateway.requests().await[0].transaction_details.gross_amount, 46000);
    }

    #[tokio::test]
    async fn test_mock_rejects_inconsistent_gross_amount() {
        let gateway = MockPaymentGateway::new();
        let mut request = PaymentOrchestrator::transaction_request(&order());
        request.transaction_details.gross_amount = 1;

        let err = gateway.create_transaction(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_failing_gateway_surfaces_unavailable() {
        let gateway = Arc::new(MockPaymentGateway::failing("connection reset"));
        let orchestrator = PaymentOrchestrator::new(gateway.clone());

        let err = orchestrator.create_transaction(&order()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(reason) if reason == "connection reset"));
        assert_eq!(gateway.calls().await, 1);
    }
}
