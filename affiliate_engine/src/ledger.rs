//! # Ledger primitives
//!
//! Package pricing and the commission schedule. Everything in this module is pure: no I/O, no clocks, and no floating
//! point. Amounts are [`Paise`] and tax rates are held in basis points, so every calculation here is exact integer
//! arithmetic.
//!
//! The tax on a package is `floor(base_price * rate / 100)`, where `rate` is a percentage. With the rate held in basis
//! points this becomes `base_price * bps / 10_000`, and since prices are never negative, integer division is the floor.
use std::fmt::Display;

use affiliate_common::Paise;
use log::*;
use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::{
    db_types::{CommissionLevel, NewPackage, Package, PackageTier},
    referrals::ReferralChain,
};

//--------------------------------------       TaxRate       ---------------------------------------------------------
/// A tax rate in basis points, i.e. hundredths of a percent. `TaxRate::from_basis_points(1800)` is 18%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct TaxRate(i64);

/// Indian Goods and Services Tax at the standard 18% rate.
pub const GST: TaxRate = TaxRate(1800);

impl TaxRate {
    pub const fn from_basis_points(bps: i64) -> Self {
        Self(bps)
    }

    pub const fn from_percent(percent: i64) -> Self {
        Self(percent * 100)
    }

    pub fn basis_points(&self) -> i64 {
        self.0
    }
}

impl Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

pub fn tax_amount(base_price: Paise, rate: TaxRate) -> Paise {
    Paise::from(base_price.value() * rate.basis_points() / 10_000)
}

pub fn final_price(base_price: Paise, rate: TaxRate) -> Paise {
    base_price + tax_amount(base_price, rate)
}

//--------------------------------------       Features      ---------------------------------------------------------
/// Decodes a stored JSON feature list. A missing, malformed, or non-string-array blob yields an empty list.
pub fn parse_features(features: Option<&str>) -> Vec<String> {
    let Some(raw) = features else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(e) => {
            warn!("📦️ Ignoring malformed package feature list ({e}): {raw}");
            Vec::new()
        },
    }
}

pub fn serialize_features(features: &[String]) -> String {
    serde_json::to_string(features).unwrap_or_else(|_| "[]".to_string())
}

//--------------------------------------     Default catalog     -----------------------------------------------------
fn features(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The three packages that are seeded into an empty database.
pub fn default_catalog() -> Vec<NewPackage> {
    vec![
        NewPackage {
            tier: PackageTier::Silver,
            name: "Silver Package".to_string(),
            description: Some("Basic learning package with essential courses".to_string()),
            base_price: Paise::from(254_237),
            gst_rate: GST,
            direct_commission: Paise::from(50_000),
            indirect_commission: Paise::from(25_000),
            features: features(&[
                "Access to basic courses",
                "Community support",
                "Mobile app access",
                "Certificate of completion",
            ]),
        },
        NewPackage {
            tier: PackageTier::Gold,
            name: "Gold Package".to_string(),
            description: Some("Premium learning package with advanced courses".to_string()),
            base_price: Paise::from(423_559),
            gst_rate: GST,
            direct_commission: Paise::from(100_000),
            indirect_commission: Paise::from(50_000),
            features: features(&[
                "All Silver features",
                "Advanced courses",
                "1-on-1 mentoring",
                "Priority support",
                "Exclusive webinars",
            ]),
        },
        NewPackage {
            tier: PackageTier::Platinum,
            name: "Platinum Package".to_string(),
            description: Some("Ultimate learning package with all premium features".to_string()),
            base_price: Paise::from(677_966),
            gst_rate: GST,
            direct_commission: Paise::from(150_000),
            indirect_commission: Paise::from(75_000),
            features: features(&[
                "All Gold features",
                "Master classes",
                "Personal career coaching",
                "Lifetime access",
                "VIP community access",
            ]),
        },
    ]
}

//--------------------------------------  Commission schedule  -----------------------------------------------------
/// A commission that is owed to `earner_id` for a single purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionShare {
    pub earner_id: i64,
    pub level: CommissionLevel,
    pub amount: Paise,
}

/// Splits the commissions for a purchase of `package` across the buyer's referral chain.
///
/// The direct referrer earns the package's direct commission and the referrer's referrer earns the indirect
/// commission. Levels without an earner are simply omitted, so the result has zero, one or two entries.
pub fn commission_shares(package: &Package, chain: &ReferralChain) -> Vec<CommissionShare> {
    let direct = chain.direct.map(|earner_id| CommissionShare {
        earner_id,
        level: CommissionLevel::Direct,
        amount: package.direct_commission,
    });
    let indirect = chain.indirect.map(|earner_id| CommissionShare {
        earner_id,
        level: CommissionLevel::Indirect,
        amount: package.indirect_commission,
    });
    direct.into_iter().chain(indirect).collect()
}
