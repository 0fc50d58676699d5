//! Data types that are persisted by the ledger backends.
use std::{fmt::Display, str::FromStr};

pub use affiliate_common::Paise;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

use crate::ledger::{self, TaxRate};

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------     PackageTier     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PackageTier {
    Silver,
    Gold,
    Platinum,
}

impl PackageTier {
    pub const ALL: [PackageTier; 3] = [PackageTier::Silver, PackageTier::Gold, PackageTier::Platinum];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageTier::Silver => "silver",
            PackageTier::Gold => "gold",
            PackageTier::Platinum => "platinum",
        }
    }
}

impl Display for PackageTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageTier {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            _ => Err(ConversionError(format!("Unknown package tier: {s}"))),
        }
    }
}

//--------------------------------------       Package       ---------------------------------------------------------
/// A purchasable package. Rows are seeded once and are read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Package {
    pub id: i64,
    pub tier: PackageTier,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Paise,
    #[sqlx(rename = "gst_rate_bps")]
    pub gst_rate: TaxRate,
    pub direct_commission: Paise,
    pub indirect_commission: Paise,
    /// The raw JSON feature list, as stored. Use [`Package::feature_list`] to decode it.
    pub features: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Package {
    pub fn tax_amount(&self) -> Paise {
        ledger::tax_amount(self.base_price, self.gst_rate)
    }

    /// The price the customer is charged.
    pub fn final_price(&self) -> Paise {
        ledger::final_price(self.base_price, self.gst_rate)
    }

    pub fn feature_list(&self) -> Vec<String> {
        ledger::parse_features(self.features.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackage {
    pub tier: PackageTier,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Paise,
    pub gst_rate: TaxRate,
    pub direct_commission: Paise,
    pub indirect_commission: Paise,
    pub features: Vec<String>,
}

//--------------------------------------         User        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub referrer_id: Option<i64>,
    pub package_tier: Option<PackageTier>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    /// An argon2 PHC string. Plain-text passwords never reach the database layer.
    pub password_hash: String,
    pub referrer_id: Option<i64>,
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The gateway order has been created, but no verified payment has been seen yet.
    Pending,
    /// A verified payment was recorded. This status is terminal.
    Completed,
    /// Reserved. Nothing in the settlement flow writes this status.
    Failed,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Completed => write!(f, "completed"),
            OrderStatusType::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub package_id: i64,
    /// The order id assigned by the payment gateway
    pub remote_order_id: String,
    pub remote_payment_id: Option<String>,
    pub remote_signature: Option<String>,
    pub amount: Paise,
    pub currency: String,
    pub receipt: String,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub package_id: i64,
    pub remote_order_id: String,
    pub amount: Paise,
    pub currency: String,
    pub receipt: String,
}

//--------------------------------------   CommissionLevel   ---------------------------------------------------------
/// How far up the referral chain the earner sits from the buyer. Serialized as the integers 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[repr(i64)]
#[serde(into = "i64", try_from = "i64")]
pub enum CommissionLevel {
    /// The buyer's own referrer
    Direct = 1,
    /// The referrer's referrer
    Indirect = 2,
}

impl From<CommissionLevel> for i64 {
    fn from(level: CommissionLevel) -> Self {
        level as i64
    }
}

impl TryFrom<i64> for CommissionLevel {
    type Error = ConversionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Direct),
            2 => Ok(Self::Indirect),
            v => Err(ConversionError(format!("Invalid commission level: {v}"))),
        }
    }
}

impl Display for CommissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommissionLevel::Direct => write!(f, "L1"),
            CommissionLevel::Indirect => write!(f, "L2"),
        }
    }
}

//--------------------------------------      Commission     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Commission {
    pub id: i64,
    pub earner_id: i64,
    pub order_id: i64,
    pub level: CommissionLevel,
    pub amount: Paise,
    pub paid_out: bool,
    pub paid_out_at: Option<DateTime<Utc>>,
    pub payout_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------     PayoutStatus    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Completed,
    Failed,
}

impl Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutStatus::Pending => write!(f, "pending"),
            PayoutStatus::Completed => write!(f, "completed"),
            PayoutStatus::Failed => write!(f, "failed"),
        }
    }
}

//--------------------------------------        Payout       ---------------------------------------------------------
pub const DEFAULT_PAYMENT_METHOD: &str = "bank_transfer";

/// A bookkeeping record of a batch of commissions that were (or will be) disbursed to the earner.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Payout {
    pub id: i64,
    pub user_id: i64,
    pub amount: Paise,
    pub commission_ids: Json<Vec<i64>>,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub status: PayoutStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewPayout {
    pub user_id: i64,
    pub commission_ids: Vec<i64>,
    pub payment_method: String,
    pub transaction_id: Option<String>,
}

impl NewPayout {
    pub fn new(user_id: i64, commission_ids: Vec<i64>) -> Self {
        Self { user_id, commission_ids, payment_method: DEFAULT_PAYMENT_METHOD.to_string(), transaction_id: None }
    }

    pub fn with_payment_method<S: Into<String>>(mut self, method: S) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_transaction_id<S: Into<String>>(mut self, txid: S) -> Self {
        self.transaction_id = Some(txid.into());
        self
    }
}
