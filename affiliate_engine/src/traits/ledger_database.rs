use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType, PackageTier, PayoutStatus},
    traits::{
        data_objects::{PaymentConfirmation, SettledOrder},
        CatalogManagement,
        UserManagement,
    },
};

#[derive(Debug, Clone, Error)]
pub enum LedgerDatabaseError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("A user with email {0} already exists")]
    EmailAlreadyExists(String),
    #[error("The referrer (user #{0}) does not exist")]
    ReferrerNotFound(i64),
    #[error("The requested user #{0} does not exist")]
    UserNotFound(i64),
    #[error("There is no package for the {0} tier")]
    PackageNotFound(PackageTier),
    #[error("The requested package #{0} does not exist")]
    PackageIdNotFound(i64),
    #[error("Cannot insert order, since gateway order {0} has already been recorded")]
    OrderAlreadyExists(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(String),
    #[error("Order {0} has already been completed")]
    OrderAlreadyCompleted(String),
    #[error("Order {0} cannot be settled, since its status is {1}")]
    OrderNotPending(String, OrderStatusType),
    #[error("The requested payout #{0} does not exist")]
    PayoutNotFound(i64),
    #[error("Invalid payout request. {0}")]
    InvalidPayout(String),
    #[error("Payout #{0} has already been marked as {1}")]
    PayoutAlreadyFinalized(i64, PayoutStatus),
}

impl From<sqlx::Error> for LedgerDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        LedgerDatabaseError::DatabaseError(e.to_string())
    }
}

/// This trait defines the highest level of behaviour for backends supporting the affiliate ledger.
///
/// This behaviour includes:
/// * Recording new (pending) orders against a gateway order id.
/// * Settling orders: the atomic `pending -> completed` transition along with its side effects.
/// * Order lookups.
#[allow(async_fn_in_trait)]
pub trait LedgerDatabase: Clone + CatalogManagement + UserManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Records a new order in `pending` status. Gateway order ids are unique, so inserting the same remote order twice
    /// returns [`LedgerDatabaseError::OrderAlreadyExists`].
    async fn insert_order(&self, order: NewOrder) -> Result<Order, LedgerDatabaseError>;

    async fn fetch_order_by_remote_id(&self, remote_order_id: &str) -> Result<Option<Order>, LedgerDatabaseError>;

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LedgerDatabaseError>;

    /// Settles an order whose payment has *already been verified* by the caller. In a single atomic transaction:
    /// * The order is moved from `pending` to `completed` and the gateway payment id and signature are recorded. This
    ///   is a compare-and-set on the status, so of any number of concurrent callers, exactly one wins.
    /// * The buyer is granted the package's tier.
    /// * The buyer's referral chain is resolved and the commission records are written.
    ///
    /// If any step fails, nothing is persisted and the order stays `pending`.
    ///
    /// ## Failure modes
    /// * [`LedgerDatabaseError::OrderNotFound`] if there is no order for the gateway order id.
    /// * [`LedgerDatabaseError::OrderAlreadyCompleted`] if the order was completed previously, including by a
    ///   concurrent call that won the race.
    /// * [`LedgerDatabaseError::OrderNotPending`] for any other status.
    async fn settle_order(&self, confirmation: &PaymentConfirmation) -> Result<SettledOrder, LedgerDatabaseError>;
}
