//! # Referral resolver
//!
//! Every user has at most one referrer. Commissions are paid two levels up the chain: the buyer's referrer (level 1)
//! and that referrer's referrer (level 2). Anyone further up earns nothing, so the resolver makes exactly two lookups
//! and never walks the tree.
use log::*;

/// The (at most two) ancestors of a buyer that earn commission on a purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferralChain {
    pub direct: Option<i64>,
    pub indirect: Option<i64>,
}

impl ReferralChain {
    pub fn is_empty(&self) -> bool {
        self.direct.is_none() && self.indirect.is_none()
    }
}

/// Anything that can answer "who referred this user?".
///
/// The SQLite connection implements this so that the chain can be resolved inside the settlement transaction.
#[allow(async_fn_in_trait)]
pub trait ReferrerLookup {
    type Error;

    /// Returns the id of the user that referred `user_id`, or `None` if they signed up without a referrer (or do not
    /// exist).
    async fn referrer_of(&mut self, user_id: i64) -> Result<Option<i64>, Self::Error>;
}

pub async fn resolve_chain<L: ReferrerLookup>(lookup: &mut L, user_id: i64) -> Result<ReferralChain, L::Error> {
    let direct = lookup.referrer_of(user_id).await?.filter(|&id| id != user_id);
    let indirect = match direct {
        Some(parent) => lookup.referrer_of(parent).await?.filter(|&id| id != user_id && id != parent),
        None => None,
    };
    trace!("🔗️ Referral chain for user #{user_id}: {direct:?} -> {indirect:?}");
    Ok(ReferralChain { direct, indirect })
}
