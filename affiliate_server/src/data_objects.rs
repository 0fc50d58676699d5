use std::fmt::Display;

use affiliate_common::Paise;
use affiliate_engine::{
    db_types::{PackageTier, User},
    order_objects::OpenedOrder,
    traits::PaymentConfirmation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//--------------------------------------        Auth         ---------------------------------------------------------
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest").field("email", &self.email).field("password", &"****").finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: User) -> Self {
        Self { access_token, token_type: "bearer".to_string(), user }
    }
}

//--------------------------------------      Payments       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub package_tier: PackageTier,
}

/// The parameters the checkout widget needs to collect payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub amount: Paise,
    pub currency: String,
    /// The gateway's publishable key id
    pub key: String,
    pub package_tier: PackageTier,
    pub package_name: String,
}

impl From<OpenedOrder> for CreateOrderResponse {
    fn from(order: OpenedOrder) -> Self {
        Self {
            order_id: order.remote_order_id,
            amount: order.amount,
            currency: order.currency,
            key: order.gateway_public_key,
            package_tier: order.tier,
            package_name: order.package_name,
        }
    }
}

/// The three values the checkout widget hands back once the customer has paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

impl From<VerifyPaymentRequest> for PaymentConfirmation {
    fn from(req: VerifyPaymentRequest) -> Self {
        PaymentConfirmation {
            remote_order_id: req.razorpay_order_id,
            remote_payment_id: req.razorpay_payment_id,
            signature: req.razorpay_signature,
        }
    }
}
