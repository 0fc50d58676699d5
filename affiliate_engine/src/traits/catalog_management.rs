use crate::{
    db_types::{NewPackage, Package, PackageTier},
    traits::LedgerDatabaseError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPackageResult {
    Inserted(Package),
    AlreadyExists(PackageTier),
}

/// Behaviour for the package catalog. Packages are effectively constants: they are inserted once, and never updated.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches all packages, ordered from the cheapest tier to the most expensive.
    async fn fetch_packages(&self) -> Result<Vec<Package>, LedgerDatabaseError>;

    async fn fetch_package_by_tier(&self, tier: PackageTier) -> Result<Option<Package>, LedgerDatabaseError>;

    async fn fetch_package(&self, id: i64) -> Result<Option<Package>, LedgerDatabaseError>;

    /// Inserts the package if, and only if, no package exists for its tier. Existing rows are left untouched.
    async fn insert_package_if_missing(&self, package: NewPackage) -> Result<InsertPackageResult, LedgerDatabaseError>;
}
