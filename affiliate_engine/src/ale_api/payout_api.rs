use std::fmt::Debug;

use log::*;

use crate::{
    ale_api::errors::PayoutError,
    db_types::{NewPayout, Payout, PayoutStatus},
    traits::PayoutManagement,
};

/// Bookkeeping for commission payouts. No money moves through this API; it only records what was (or will be) paid.
pub struct PayoutApi<B> {
    db: B,
}

impl<B: Debug> Debug for PayoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PayoutApi ({:?})", self.db)
    }
}

impl<B> PayoutApi<B>
where B: PayoutManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Groups the given unpaid commissions into a new `pending` payout and marks them as paid out.
    pub async fn record_payout(&self, payout: NewPayout) -> Result<Payout, PayoutError> {
        let user_id = payout.user_id;
        let payout = self.db.create_payout(payout).await?;
        info!(
            "🗃️ Payout #{} of {} recorded for user #{user_id} covering {} commissions",
            payout.id,
            payout.amount,
            payout.commission_ids.len()
        );
        Ok(payout)
    }

    pub async fn complete_payout(&self, payout_id: i64, transaction_id: Option<String>) -> Result<Payout, PayoutError> {
        let payout = self.db.finalize_payout(payout_id, PayoutStatus::Completed, transaction_id).await?;
        info!("🗃️ Payout #{payout_id} completed");
        Ok(payout)
    }

    pub async fn fail_payout(&self, payout_id: i64) -> Result<Payout, PayoutError> {
        let payout = self.db.finalize_payout(payout_id, PayoutStatus::Failed, None).await?;
        warn!("🗃️ Payout #{payout_id} of {} for user #{} was marked as failed", payout.amount, payout.user_id);
        Ok(payout)
    }

    pub async fn payouts_for_user(&self, user_id: i64) -> Result<Vec<Payout>, PayoutError> {
        let payouts = self.db.fetch_payouts_for_user(user_id).await?;
        Ok(payouts)
    }
}
