//! `SqliteDatabase` is a concrete implementation of an affiliate ledger backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use affiliate_common::Paise;
use chrono::Utc;
use log::*;
use sqlx::{migrate::Migrator, SqlitePool};

use super::db::{commissions, db_url, new_pool, orders, packages, payouts, users};
use crate::{
    db_types::{
        Commission,
        NewOrder,
        NewPackage,
        NewPayout,
        NewUser,
        Order,
        OrderStatusType,
        Package,
        PackageTier,
        Payout,
        PayoutStatus,
        User,
    },
    ledger::commission_shares,
    referrals::resolve_chain,
    traits::{
        CatalogManagement,
        CommissionManagement,
        EarningsSummary,
        InsertPackageResult,
        LedgerDatabase,
        LedgerDatabaseError,
        PaymentConfirmation,
        PayoutManagement,
        ReferralCounts,
        SettledOrder,
        UserManagement,
    },
};

static MIGRATOR: Migrator = sqlx::migrate!("./src/sqlite/migrations");

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl LedgerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, LedgerDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order_by_remote_id(&self, remote_order_id: &str) -> Result<Option<Order>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_remote_id(remote_order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        Ok(orders)
    }

    async fn settle_order(&self, confirmation: &PaymentConfirmation) -> Result<SettledOrder, LedgerDatabaseError> {
        let remote_id = confirmation.remote_order_id.as_str();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        // The status compare-and-set must be the first statement in the transaction
        let order = match orders::mark_completed(confirmation, now, &mut tx).await? {
            Some(order) => order,
            None => {
                tx.rollback().await?;
                return Err(self.explain_unsettleable_order(remote_id).await);
            },
        };
        let package = packages::fetch_package(order.package_id, &mut tx)
            .await?
            .ok_or(LedgerDatabaseError::PackageIdNotFound(order.package_id))?;
        users::grant_package(order.user_id, package.tier, now, &mut tx).await?;
        let chain = resolve_chain(&mut *tx, order.user_id).await?;
        let shares = commission_shares(&package, &chain);
        let mut new_commissions = Vec::with_capacity(shares.len());
        for share in &shares {
            let commission = commissions::insert_commission(order.id, share, now, &mut tx).await?;
            new_commissions.push(commission);
        }
        tx.commit().await?;
        debug!(
            "🗃️ Order [{remote_id}] settled. User #{} now holds {}. {} commissions recorded.",
            order.user_id,
            package.tier,
            new_commissions.len()
        );
        Ok(SettledOrder { order, commissions: new_commissions })
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_packages(&self) -> Result<Vec<Package>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let packages = packages::fetch_packages(&mut conn).await?;
        Ok(packages)
    }

    async fn fetch_package_by_tier(&self, tier: PackageTier) -> Result<Option<Package>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let package = packages::fetch_package_by_tier(tier, &mut conn).await?;
        Ok(package)
    }

    async fn fetch_package(&self, id: i64) -> Result<Option<Package>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let package = packages::fetch_package(id, &mut conn).await?;
        Ok(package)
    }

    async fn insert_package_if_missing(&self, package: NewPackage) -> Result<InsertPackageResult, LedgerDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let result = packages::insert_if_missing(package, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }
}

impl UserManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, LedgerDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let user = users::insert_user(user, &mut tx).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_email(email, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_direct_referrals(&self, user_id: i64) -> Result<Vec<User>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let referrals = users::fetch_direct_referrals(user_id, &mut conn).await?;
        Ok(referrals)
    }

    async fn fetch_indirect_referrals(&self, user_id: i64) -> Result<Vec<User>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let referrals = users::fetch_indirect_referrals(user_id, &mut conn).await?;
        Ok(referrals)
    }

    async fn count_referrals(&self, user_id: i64) -> Result<ReferralCounts, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let counts = users::count_referrals(user_id, &mut conn).await?;
        Ok(counts)
    }
}

impl CommissionManagement for SqliteDatabase {
    async fn fetch_commissions_for_earner(&self, earner_id: i64) -> Result<Vec<Commission>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let commissions = commissions::fetch_commissions_for_earner(earner_id, &mut conn).await?;
        Ok(commissions)
    }

    async fn fetch_commissions_for_order(&self, order_id: i64) -> Result<Vec<Commission>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let commissions = commissions::fetch_commissions_for_order(order_id, &mut conn).await?;
        Ok(commissions)
    }

    async fn fetch_earnings_summary(&self, earner_id: i64) -> Result<EarningsSummary, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let summary = commissions::earnings_summary(earner_id, &mut conn).await?;
        Ok(summary)
    }
}

impl PayoutManagement for SqliteDatabase {
    async fn create_payout(&self, payout: NewPayout) -> Result<Payout, LedgerDatabaseError> {
        let mut ids = payout.commission_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(LedgerDatabaseError::InvalidPayout("A payout must include at least one commission".into()));
        }
        if ids.len() != payout.commission_ids.len() {
            return Err(LedgerDatabaseError::InvalidPayout("Commission ids must be unique".into()));
        }
        let mut tx = self.pool.begin().await?;
        let found = commissions::fetch_commissions_by_id(&ids, &mut tx).await?;
        if found.len() != ids.len() {
            return Err(LedgerDatabaseError::InvalidPayout("One or more commissions do not exist".into()));
        }
        if let Some(c) = found.iter().find(|c| c.earner_id != payout.user_id) {
            return Err(LedgerDatabaseError::InvalidPayout(format!(
                "Commission #{} does not belong to user #{}",
                c.id, payout.user_id
            )));
        }
        if let Some(c) = found.iter().find(|c| c.paid_out) {
            return Err(LedgerDatabaseError::InvalidPayout(format!("Commission #{} has already been paid out", c.id)));
        }
        let amount = found.iter().map(|c| c.amount).sum::<Paise>();
        let now = Utc::now();
        let new_payout = payouts::insert_payout(&payout, amount, now, &mut tx).await?;
        let updated = commissions::mark_paid_out(&ids, new_payout.id, now, &mut tx).await?;
        if updated as usize != ids.len() {
            // Someone else paid out one of these commissions between our read and our write
            warn!("🗃️ Payout for user #{} lost a race with another payout. Rolling back.", payout.user_id);
            return Err(LedgerDatabaseError::InvalidPayout("One or more commissions have already been paid out".into()));
        }
        tx.commit().await?;
        Ok(new_payout)
    }

    async fn finalize_payout(
        &self,
        payout_id: i64,
        status: PayoutStatus,
        transaction_id: Option<String>,
    ) -> Result<Payout, LedgerDatabaseError> {
        if status == PayoutStatus::Pending {
            return Err(LedgerDatabaseError::InvalidPayout("A payout can only be finalized as completed or failed".into()));
        }
        let mut tx = self.pool.begin().await?;
        let updated = payouts::finalize_payout(payout_id, status, transaction_id, Utc::now(), &mut tx).await?;
        let result = match updated {
            Some(p) => Ok(p),
            None => match payouts::fetch_payout(payout_id, &mut tx).await? {
                Some(p) => Err(LedgerDatabaseError::PayoutAlreadyFinalized(payout_id, p.status)),
                None => Err(LedgerDatabaseError::PayoutNotFound(payout_id)),
            },
        };
        tx.commit().await?;
        result
    }

    async fn fetch_payout(&self, payout_id: i64) -> Result<Option<Payout>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let payout = payouts::fetch_payout(payout_id, &mut conn).await?;
        Ok(payout)
    }

    async fn fetch_payouts_for_user(&self, user_id: i64) -> Result<Vec<Payout>, LedgerDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let payouts = payouts::fetch_payouts_for_user(user_id, &mut conn).await?;
        Ok(payouts)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. Migrations that have already been applied are skipped.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }

    /// Works out why the compare-and-set in [`orders::mark_completed`] did not match.
    async fn explain_unsettleable_order(&self, remote_order_id: &str) -> LedgerDatabaseError {
        let mut conn = match self.pool.acquire().await {
            Ok(c) => c,
            Err(e) => return e.into(),
        };
        match orders::fetch_order_by_remote_id(remote_order_id, &mut conn).await {
            Ok(None) => LedgerDatabaseError::OrderNotFound(remote_order_id.to_string()),
            Ok(Some(o)) if o.status == OrderStatusType::Completed => {
                LedgerDatabaseError::OrderAlreadyCompleted(remote_order_id.to_string())
            },
            Ok(Some(o)) => LedgerDatabaseError::OrderNotPending(remote_order_id.to_string(), o.status),
            Err(e) => e.into(),
        }
    }
}
