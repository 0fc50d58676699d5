use std::fmt::Debug;

use affiliate_common::Paise;
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{NewPackage, Package, PackageTier},
    ledger::{default_catalog, TaxRate},
    traits::{CatalogManagement, InsertPackageResult, LedgerDatabaseError},
};

/// A package as it is shown to customers, with the derived price fields filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageListing {
    pub id: i64,
    pub tier: PackageTier,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Paise,
    pub gst_rate: TaxRate,
    pub gst_amount: Paise,
    pub final_price: Paise,
    pub direct_commission: Paise,
    pub indirect_commission: Paise,
    pub features: Vec<String>,
}

impl From<Package> for PackageListing {
    fn from(p: Package) -> Self {
        Self {
            gst_amount: p.tax_amount(),
            final_price: p.final_price(),
            features: p.feature_list(),
            id: p.id,
            tier: p.tier,
            name: p.name,
            description: p.description,
            base_price: p.base_price,
            gst_rate: p.gst_rate,
            direct_commission: p.direct_commission,
            indirect_commission: p.indirect_commission,
        }
    }
}

pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn list_packages(&self) -> Result<Vec<PackageListing>, LedgerDatabaseError> {
        let packages = self.db.fetch_packages().await?;
        Ok(packages.into_iter().map(PackageListing::from).collect())
    }

    pub async fn package_by_tier(&self, tier: PackageTier) -> Result<Package, LedgerDatabaseError> {
        self.db.fetch_package_by_tier(tier).await?.ok_or(LedgerDatabaseError::PackageNotFound(tier))
    }

    /// Inserts any packages from the list that do not exist yet. Returns the number of packages that were inserted.
    pub async fn seed_packages(&self, packages: Vec<NewPackage>) -> Result<usize, LedgerDatabaseError> {
        let mut inserted = 0;
        for package in packages {
            match self.db.insert_package_if_missing(package).await? {
                InsertPackageResult::Inserted(p) => {
                    info!("📦️ Seeded the {} package ({}) at {}", p.tier, p.name, p.final_price());
                    inserted += 1;
                },
                InsertPackageResult::AlreadyExists(tier) => trace!("📦️ The {tier} package already exists"),
            }
        }
        Ok(inserted)
    }

    /// Seeds the standard Silver, Gold and Platinum packages. Safe to call on every start-up.
    pub async fn seed_default_packages(&self) -> Result<usize, LedgerDatabaseError> {
        self.seed_packages(default_catalog()).await
    }
}
