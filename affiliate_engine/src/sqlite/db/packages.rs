use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPackage, Package, PackageTier},
    ledger::serialize_features,
    traits::{InsertPackageResult, LedgerDatabaseError},
};

/// Fetches the catalog, cheapest package first.
pub async fn fetch_packages(conn: &mut SqliteConnection) -> Result<Vec<Package>, sqlx::Error> {
    let packages = sqlx::query_as("SELECT * FROM packages ORDER BY base_price ASC, id ASC").fetch_all(conn).await?;
    Ok(packages)
}

pub async fn fetch_package_by_tier(
    tier: PackageTier,
    conn: &mut SqliteConnection,
) -> Result<Option<Package>, sqlx::Error> {
    let package = sqlx::query_as("SELECT * FROM packages WHERE tier = $1").bind(tier).fetch_optional(conn).await?;
    Ok(package)
}

pub async fn fetch_package(id: i64, conn: &mut SqliteConnection) -> Result<Option<Package>, sqlx::Error> {
    let package = sqlx::query_as("SELECT * FROM packages WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(package)
}

/// Inserts the package unless its tier already has a row. The tier column is unique, so this is safe to call
/// concurrently: the losing insert is simply a no-op.
pub async fn insert_if_missing(
    package: NewPackage,
    conn: &mut SqliteConnection,
) -> Result<InsertPackageResult, LedgerDatabaseError> {
    let tier = package.tier;
    let inserted: Option<Package> = sqlx::query_as(
        r#"
            INSERT INTO packages (
                tier,
                name,
                description,
                base_price,
                gst_rate_bps,
                direct_commission,
                indirect_commission,
                features,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (tier) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(package.tier)
    .bind(package.name)
    .bind(package.description)
    .bind(package.base_price)
    .bind(package.gst_rate)
    .bind(package.direct_commission)
    .bind(package.indirect_commission)
    .bind(serialize_features(&package.features))
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;
    match inserted {
        Some(p) => {
            debug!("🗃️ Package {} ({}) inserted with id {}", p.name, p.tier, p.id);
            Ok(InsertPackageResult::Inserted(p))
        },
        None => Ok(InsertPackageResult::AlreadyExists(tier)),
    }
}
