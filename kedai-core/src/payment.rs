use async_trait::async_trait;
use kedai_shared::Amount;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: Amount,
}

/// One entry of `item_details`. The gateway checks that
/// `Σ price × quantity` equals `gross_amount`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDetail {
    pub id: String,
    pub price: Amount,
    pub quantity: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreditCard {
    pub secure: bool,
}

/// Body of a transaction-creation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRequest {
    pub transaction_details: TransactionDetails,
    pub item_details: Vec<ItemDetail>,
    pub credit_card: CreditCard,
}

/// The gateway's answer. Unknown fields are kept so the response can be
/// handed back to the storefront verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Gateway rejected the transaction (HTTP {status}): {}", .messages.join("; "))]
    Rejected { status: u16, messages: Vec<String> },
    #[error("Undecodable gateway response: {0}")]
    Decode(String),
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Create a transaction and obtain a token for the hosted payment widget.
    /// Called exactly once per checkout; implementations must not retry.
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, GatewayError>;
}

/// How the hosted payment widget finished.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded(Value),
    Pending(Value),
    Failed(Value),
    /// The shopper closed the widget without finishing.
    Abandoned,
}

impl PaymentOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentOutcome::Succeeded(_) => "succeeded",
            PaymentOutcome::Pending(_) => "pending",
            PaymentOutcome::Failed(_) => "failed",
            PaymentOutcome::Abandoned => "abandoned",
        }
    }
}

/// Callback interface injected into the hosted widget.
///
/// The four entry points mirror the widget's own hooks; all of them funnel
/// into [`PaymentCallbacks::notify`].
pub trait PaymentCallbacks: Send + Sync {
    fn notify(&self, outcome: PaymentOutcome);

    fn on_success(&self, result: Value) {
        self.notify(PaymentOutcome::Succeeded(result));
    }

    fn on_pending(&self, result: Value) {
        self.notify(PaymentOutcome::Pending(result));
    }

    fn on_error(&self, result: Value) {
        self.notify(PaymentOutcome::Failed(result));
    }

    fn on_close(&self) {
        self.notify(PaymentOutcome::Abandoned);
    }
}

/// Forwards widget outcomes to whoever owns the storefront state.
#[derive(Debug, Clone)]
pub struct ChannelCallbacks {
    tx: mpsc::UnboundedSender<PaymentOutcome>,
}

impl ChannelCallbacks {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PaymentOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PaymentCallbacks for ChannelCallbacks {
    fn notify(&self, outcome: PaymentOutcome) {
        let kind = outcome.kind();
        if self.tx.send(outcome).is_err() {
            tracing::warn!("Payment outcome '{}' dropped: storefront is gone", kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_callbacks_forward_all_four_outcomes() {
        let (callbacks, mut rx) = ChannelCallbacks::channel();

        callbacks.on_success(json!({"transaction_status": "settlement"}));
        callbacks.on_pending(json!({"transaction_status": "pending"}));
        callbacks.on_error(json!({"status_code": "500"}));
        callbacks.on_close();

        let kinds: Vec<&str> = [
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
        ]
        .iter()
        .map(PaymentOutcome::kind)
        .collect();

        assert_eq!(kinds, vec!["succeeded", "pending", "failed", "abandoned"]);
    }

    #[test]
    fn test_notify_after_receiver_dropped_does_not_panic() {
        let (callbacks, rx) = ChannelCallbacks::channel();
        drop(rx);
        callbacks.on_close();
    }

    #[test]
    fn test_outcome_wire_format() {
        let pending: PaymentOutcome =
            serde_json::from_value(json!({"status": "pending", "result": {"order_id": "order-1"}}))
                .unwrap();
        assert_eq!(pending, PaymentOutcome::Pending(json!({"order_id": "order-1"})));

        let abandoned: PaymentOutcome =
            serde_json::from_value(json!({"status": "abandoned"})).unwrap();
        assert_eq!(abandoned, PaymentOutcome::Abandoned);
    }

    #[test]
    fn test_response_keeps_unknown_fields() {
        let body = json!({
            "token": "66e4fa55-fdac-4ef9-91b5-733b97d1b862",
            "redirect_url": "https://app.sandbox.midtrans.com/snap/v2/vtweb/66e4fa55",
            "status_code": "201"
        });
        let response: TransactionResponse = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(response.token, "66e4fa55-fdac-4ef9-91b5-733b97d1b862");
        assert_eq!(serde_json::to_value(&response).unwrap(), body);
    }

    #[test]
    fn test_rejected_error_lists_messages() {
        let err = GatewayError::Rejected {
            status: 400,
            messages: vec!["gross_amount is not equal".into(), "order_id has been used".into()],
        };
        assert_eq!(
            err.to_string(),
            "Gateway rejected the transaction (HTTP 400): gross_amount is not equal; order_id has been used"
        );
    }
}
