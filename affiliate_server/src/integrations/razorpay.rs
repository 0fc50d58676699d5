use affiliate_common::Paise;
use affiliate_engine::traits::{GatewayError, PaymentGateway, RemoteOrder, RemotePayment};
use log::*;
use razorpay_tools::{NewRazorpayOrder, RazorpayApi, RazorpayApiError, RazorpayConfig, RazorpayOrder, RazorpayPayment};

/// The [`PaymentGateway`] backed by the Razorpay REST API.
#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let api = RazorpayApi::new(config).map_err(|e| GatewayError::Configuration(e.to_string()))?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &RazorpayApi {
        &self.api
    }
}

fn to_gateway_error(e: RazorpayApiError) -> GatewayError {
    match e {
        RazorpayApiError::Initialization(msg) => GatewayError::Configuration(msg),
        e if e.is_transient() => GatewayError::Unavailable(e.to_string()),
        e => GatewayError::Rejected(e.to_string()),
    }
}

fn to_remote_order(order: RazorpayOrder) -> RemoteOrder {
    RemoteOrder {
        id: order.id,
        amount: Paise::from(order.amount),
        currency: order.currency,
        receipt: order.receipt.unwrap_or_default(),
        status: order.status,
    }
}

fn to_remote_payment(payment: RazorpayPayment) -> RemotePayment {
    RemotePayment {
        id: payment.id,
        remote_order_id: payment.order_id,
        amount: Paise::from(payment.amount),
        currency: payment.currency,
        status: payment.status,
        method: payment.method,
        captured: payment.captured,
    }
}

impl PaymentGateway for RazorpayGateway {
    fn public_key(&self) -> &str {
        self.api.key_id()
    }

    async fn create_remote_order(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &str,
    ) -> Result<RemoteOrder, GatewayError> {
        if self.api.key_id().is_empty() {
            return Err(GatewayError::Configuration("No Razorpay key id has been configured".to_string()));
        }
        let order = self
            .api
            .create_order(NewRazorpayOrder::new(amount.value(), currency, receipt))
            .await
            .map_err(|e| {
                warn!("💳️ Could not create gateway order for {receipt}. {e}");
                to_gateway_error(e)
            })?;
        Ok(to_remote_order(order))
    }

    fn verify_signature(&self, remote_order_id: &str, remote_payment_id: &str, signature: &str) -> bool {
        self.api.verify_payment_signature(remote_order_id, remote_payment_id, signature)
    }

    async fn fetch_remote_payment(&self, remote_payment_id: &str) -> Result<RemotePayment, GatewayError> {
        let payment = self.api.fetch_payment(remote_payment_id).await.map_err(to_gateway_error)?;
        Ok(to_remote_payment(payment))
    }
}
