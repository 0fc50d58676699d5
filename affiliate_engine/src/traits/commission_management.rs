use crate::{
    db_types::Commission,
    traits::{EarningsSummary, LedgerDatabaseError},
};

/// Read-side access to commission records. Commissions are only ever written by settlement, and only their payout
/// fields are ever modified (by [`crate::traits::PayoutManagement`]).
#[allow(async_fn_in_trait)]
pub trait CommissionManagement {
    /// All commissions earned by the user, most recent first.
    async fn fetch_commissions_for_earner(&self, earner_id: i64) -> Result<Vec<Commission>, LedgerDatabaseError>;

    /// The commissions generated by a single order. There are at most two.
    async fn fetch_commissions_for_order(&self, order_id: i64) -> Result<Vec<Commission>, LedgerDatabaseError>;

    async fn fetch_earnings_summary(&self, earner_id: i64) -> Result<EarningsSummary, LedgerDatabaseError>;
}
