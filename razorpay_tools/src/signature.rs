//! Checkout callback signatures.
//!
//! Once a customer pays, the checkout widget hands the client three values: the gateway order id, the payment id, and
//! `razorpay_signature`, which is the hex-encoded HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed with the merchant's
//! key secret. Only the merchant and the gateway know the secret, so a matching signature proves that the gateway
//! really saw that payment against that order.
use hmac::{Hmac, Mac};
use log::*;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn signing_mac(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(mac)
}

/// Computes the hex-encoded signature the gateway would produce for the given order and payment.
pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> Option<String> {
    signing_mac(secret, order_id, payment_id).map(|mac| hex::encode(mac.finalize().into_bytes()))
}

/// Returns true only if `signature` is the valid signature for the given order and payment.
///
/// The comparison is constant-time. Every failure mode (empty secret, malformed hex, wrong length, mismatch) yields
/// `false`; nothing is propagated to the caller.
pub fn verify_payment_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    if secret.is_empty() {
        warn!("🔐️ No key secret is configured. Rejecting payment signature for {order_id}");
        return false;
    }
    let provided = match hex::decode(signature.trim()) {
        Ok(bytes) => bytes,
        Err(_) => {
            debug!("🔐️ Payment signature for {order_id} is not valid hex");
            return false;
        },
    };
    match signing_mac(secret, order_id, payment_id) {
        Some(mac) => mac.verify_slice(&provided).is_ok(),
        None => false,
    }
}
