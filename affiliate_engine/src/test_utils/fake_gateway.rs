use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use affiliate_common::Paise;
use razorpay_tools::{payment_signature, verify_payment_signature};

use crate::traits::{GatewayError, PaymentGateway, RemoteOrder, RemotePayment};

pub const FAKE_GATEWAY_KEY_ID: &str = "rzp_test_fakegateway";
pub const FAKE_GATEWAY_SECRET: &str = "fake_gateway_secret_do_not_use";

/// An in-process stand-in for the payment gateway.
///
/// Orders get sequential ids (`order_fake_1`, `order_fake_2`, ...), and payment confirmations are signed with the same
/// HMAC scheme the real gateway uses, so [`FakeGateway::sign`] produces signatures that verify. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    counter: Arc<AtomicU64>,
    offline: Arc<AtomicBool>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs a payment confirmation the way the gateway's checkout would.
    pub fn sign(&self, remote_order_id: &str, remote_payment_id: &str) -> String {
        payment_signature(FAKE_GATEWAY_SECRET, remote_order_id, remote_payment_id).expect("HMAC accepts any key")
    }

    /// While offline, every remote call fails with [`GatewayError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// The number of remote orders created so far.
    pub fn orders_created(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable("The fake gateway is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl PaymentGateway for FakeGateway {
    fn public_key(&self) -> &str {
        FAKE_GATEWAY_KEY_ID
    }

    async fn create_remote_order(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &str,
    ) -> Result<RemoteOrder, GatewayError> {
        self.check_online()?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RemoteOrder {
            id: format!("order_fake_{n}"),
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            status: "created".to_string(),
        })
    }

    fn verify_signature(&self, remote_order_id: &str, remote_payment_id: &str, signature: &str) -> bool {
        verify_payment_signature(FAKE_GATEWAY_SECRET, remote_order_id, remote_payment_id, signature)
    }

    async fn fetch_remote_payment(&self, remote_payment_id: &str) -> Result<RemotePayment, GatewayError> {
        self.check_online()?;
        Err(GatewayError::Rejected(format!("The fake gateway does not know payment {remote_payment_id}")))
    }
}
