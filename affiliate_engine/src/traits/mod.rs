//! # Backend and collaborator contracts
//!
//! This module defines the behaviour that a storage backend must expose in order to drive the ledger, plus the
//! contract for the external payment gateway.
//!
//! ## Traits
//! * [`LedgerDatabase`] is the highest level of behaviour. It owns orders and the settlement unit of work that turns a
//!   verified payment into a completed order, an entitlement and commission records.
//! * [`CatalogManagement`] seeds and reads the package catalog.
//! * [`UserManagement`] creates users and answers questions about the referral forest.
//! * [`CommissionManagement`] provides the read side for commission histories and earnings rollups.
//! * [`PayoutManagement`] keeps the books on payouts. It never moves money.
//! * [`PaymentGateway`] is the seam to the third-party payment processor.
//!
//! All backend traits share a single error type, [`LedgerDatabaseError`].
mod catalog_management;
mod commission_management;
mod ledger_database;
mod payment_gateway;
mod payout_management;
mod user_management;

mod data_objects;

pub use catalog_management::{CatalogManagement, InsertPackageResult};
pub use commission_management::CommissionManagement;
pub use data_objects::{EarningsSummary, PaymentConfirmation, ReferralCounts, RemoteOrder, RemotePayment, SettledOrder};
pub use ledger_database::{LedgerDatabase, LedgerDatabaseError};
pub use payment_gateway::{GatewayError, PaymentGateway};
pub use payout_management::PayoutManagement;
pub use user_management::UserManagement;
