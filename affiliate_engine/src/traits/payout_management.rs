use crate::{
    db_types::{NewPayout, Payout, PayoutStatus},
    traits::LedgerDatabaseError,
};

/// Bookkeeping for payouts. A payout groups a set of a user's unpaid commissions; the actual disbursement happens
/// elsewhere, and is reflected here by finalizing the payout.
#[allow(async_fn_in_trait)]
pub trait PayoutManagement {
    /// In a single atomic transaction, creates a `pending` payout for the sum of the given commissions, and marks each
    /// of them as paid out.
    ///
    /// Every commission must exist, belong to the payout's user, and not already be paid out. Otherwise
    /// [`LedgerDatabaseError::InvalidPayout`] is returned and nothing changes.
    async fn create_payout(&self, payout: NewPayout) -> Result<Payout, LedgerDatabaseError>;

    /// Moves a `pending` payout to `completed` or `failed`. A failed payout keeps its commissions marked as paid out;
    /// reconciling failed disbursements is a manual process.
    async fn finalize_payout(
        &self,
        payout_id: i64,
        status: PayoutStatus,
        transaction_id: Option<String>,
    ) -> Result<Payout, LedgerDatabaseError>;

    async fn fetch_payout(&self, payout_id: i64) -> Result<Option<Payout>, LedgerDatabaseError>;

    async fn fetch_payouts_for_user(&self, user_id: i64) -> Result<Vec<Payout>, LedgerDatabaseError>;
}
