//! Read-only rollups of a user's earnings and referral network. Everything here is computed at read time.

use std::fmt::Debug;

use log::*;

use crate::{
    ale_api::{
        dashboard_objects::{DashboardStats, ReferralNetwork},
        errors::DashboardError,
    },
    db_types::Commission,
    traits::{CommissionManagement, UserManagement},
};

pub struct DashboardApi<B> {
    db: B,
}

impl<B: Debug> Debug for DashboardApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DashboardApi ({:?})", self.db)
    }
}

impl<B> DashboardApi<B>
where B: UserManagement + CommissionManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn stats(&self, user_id: i64) -> Result<DashboardStats, DashboardError> {
        let user = self.db.fetch_user(user_id).await?.ok_or(DashboardError::UserNotFound(user_id))?;
        let earnings = self.db.fetch_earnings_summary(user_id).await?;
        let referrals = self.db.count_referrals(user_id).await?;
        trace!("🗃️ Dashboard stats for user #{user_id}: {earnings:?}, {referrals:?}");
        Ok(DashboardStats { user, earnings, referrals })
    }

    /// The user's commission history, most recent first.
    pub async fn commissions(&self, user_id: i64) -> Result<Vec<Commission>, DashboardError> {
        let commissions = self.db.fetch_commissions_for_earner(user_id).await?;
        Ok(commissions)
    }

    pub async fn referrals(&self, user_id: i64) -> Result<ReferralNetwork, DashboardError> {
        let direct_referrals = self.db.fetch_direct_referrals(user_id).await?;
        let indirect_referrals = self.db.fetch_indirect_referrals(user_id).await?;
        Ok(ReferralNetwork { direct_referrals, indirect_referrals })
    }
}
