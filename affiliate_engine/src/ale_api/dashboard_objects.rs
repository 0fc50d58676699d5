use serde::Serialize;

use crate::{
    db_types::User,
    traits::{EarningsSummary, ReferralCounts},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub user: User,
    pub earnings: EarningsSummary,
    pub referrals: ReferralCounts,
}

/// The two levels of a user's downline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferralNetwork {
    pub direct_referrals: Vec<User>,
    pub indirect_referrals: Vec<User>,
}
