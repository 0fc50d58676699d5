use affiliate_common::Paise;
use serde::{Deserialize, Serialize};

use crate::db_types::{Commission, OrderStatusType, PackageTier};

pub const PAYMENT_VERIFIED_MESSAGE: &str = "Payment verified successfully";

/// Everything the checkout front-end needs to collect payment for a newly opened order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedOrder {
    pub remote_order_id: String,
    pub amount: Paise,
    pub currency: String,
    /// The gateway's publishable key
    pub gateway_public_key: String,
    pub tier: PackageTier,
    pub package_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    pub message: String,
    pub order_id: i64,
    pub status: OrderStatusType,
    #[serde(skip)]
    pub commissions: Vec<Commission>,
}

impl ConfirmedOrder {
    pub fn new(order_id: i64, status: OrderStatusType, commissions: Vec<Commission>) -> Self {
        Self { message: PAYMENT_VERIFIED_MESSAGE.to_string(), order_id, status, commissions }
    }
}

/// The receipt reference sent to the gateway with each new order.
pub fn receipt_reference(user_id: i64, timestamp: i64) -> String {
    format!("order_{user_id}_{timestamp}")
}
