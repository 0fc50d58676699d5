use affiliate_common::Paise;
use serde::{Deserialize, Serialize};

use crate::db_types::{Commission, Order};

/// The three values the checkout widget returns once a customer has paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub remote_order_id: String,
    pub remote_payment_id: String,
    pub signature: String,
}

impl PaymentConfirmation {
    pub fn new<S: Into<String>>(remote_order_id: S, remote_payment_id: S, signature: S) -> Self {
        Self {
            remote_order_id: remote_order_id.into(),
            remote_payment_id: remote_payment_id.into(),
            signature: signature.into(),
        }
    }
}

/// The result of a successful settlement: the completed order and the commissions it generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettledOrder {
    pub order: Order,
    pub commissions: Vec<Commission>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub total_earned: Paise,
    pub total_paid_out: Paise,
    pub available_balance: Paise,
    pub direct_earnings: Paise,
    pub indirect_earnings: Paise,
    pub total_commissions: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralCounts {
    pub direct_count: i64,
    pub indirect_count: i64,
    pub total_count: i64,
}

impl ReferralCounts {
    pub fn new(direct_count: i64, indirect_count: i64) -> Self {
        Self { direct_count, indirect_count, total_count: direct_count + indirect_count }
    }
}

/// A payment intent, as created at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOrder {
    pub id: String,
    pub amount: Paise,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

/// The gateway's view of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePayment {
    pub id: String,
    pub remote_order_id: Option<String>,
    pub amount: Paise,
    pub currency: String,
    pub status: String,
    pub method: Option<String>,
    pub captured: bool,
}
