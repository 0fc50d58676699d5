use affiliate_common::Paise;
use thiserror::Error;

use crate::traits::{RemoteOrder, RemotePayment};

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment gateway is not configured correctly. {0}")]
    Configuration(String),
    #[error("The payment gateway could not be reached, or did not respond in time. {0}")]
    Unavailable(String),
    #[error("The payment gateway rejected the request. {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Whether the same request could reasonably succeed if the caller tries again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Unavailable(_))
    }
}

/// The contract for the third-party payment processor.
///
/// Implementations must bound every remote call with a timeout, and must not retry internally; retries are the
/// caller's decision.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// The public (publishable) key that the checkout front-end needs in order to open a payment.
    fn public_key(&self) -> &str;

    /// Creates a payment intent at the gateway for `amount` in `currency`.
    async fn create_remote_order(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &str,
    ) -> Result<RemoteOrder, GatewayError>;

    /// Returns true if and only if `signature` proves that the gateway accepted `remote_payment_id` against
    /// `remote_order_id`.
    ///
    /// This must fail closed: any error while checking the signature is a `false`, never a panic or an error.
    fn verify_signature(&self, remote_order_id: &str, remote_payment_id: &str, signature: &str) -> bool;

    /// Fetches the gateway's view of a payment. This is for audit and support purposes and is not used during
    /// settlement.
    async fn fetch_remote_payment(&self, remote_payment_id: &str) -> Result<RemotePayment, GatewayError>;
}
