use crate::{
    db_types::{NewUser, User},
    traits::{LedgerDatabaseError, ReferralCounts},
};

/// The `UserManagement` trait defines behaviour for creating users and querying the referral forest.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Creates a new, active user.
    ///
    /// ## Failure modes
    /// * [`LedgerDatabaseError::EmailAlreadyExists`] if the email address is taken.
    /// * [`LedgerDatabaseError::ReferrerNotFound`] if a referrer id is given and that user does not exist.
    async fn create_user(&self, user: NewUser) -> Result<User, LedgerDatabaseError>;

    /// Fetches the user with the given id. If no user exists, `None` is returned.
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, LedgerDatabaseError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, LedgerDatabaseError>;

    /// The users that signed up with `user_id` as their referrer, oldest first.
    async fn fetch_direct_referrals(&self, user_id: i64) -> Result<Vec<User>, LedgerDatabaseError>;

    /// The users that were referred by one of `user_id`'s direct referrals, oldest first.
    async fn fetch_indirect_referrals(&self, user_id: i64) -> Result<Vec<User>, LedgerDatabaseError>;

    async fn count_referrals(&self, user_id: i64) -> Result<ReferralCounts, LedgerDatabaseError>;
}
