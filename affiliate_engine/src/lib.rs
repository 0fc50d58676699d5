//! Affiliate Ledger Engine
//!
//! The affiliate ledger sells tiered packages through a third-party payment gateway, and pays two levels of referral
//! commission on every completed purchase. This library contains the core logic for the ledger. It is
//! provider-agnostic: the payment gateway is reached through the [`traits::PaymentGateway`] trait.
//!
//! The library is divided into the following sections:
//! 1. Pure ledger primitives: package pricing and the commission schedule ([`mod@ledger`]) and the referral resolver
//!    ([`mod@referrals`]).
//! 2. Backend contracts ([`mod@traits`]) and their SQLite implementation ([`SqliteDatabase`]). You should never need
//!    to access the database directly. The exception is the data types used in the database, which are defined in
//!    [`mod@db_types`] and are public.
//! 3. The public API. [`OrderFlowApi`] is the settlement engine; [`AccountApi`], [`CatalogApi`], [`DashboardApi`] and
//!    [`PayoutApi`] cover the rest of the functionality.
//!
//! The engine also emits events that can be subscribed to. When an order completes, an `OrderCompletedEvent` is
//! emitted, followed by a `CommissionEarnedEvent` for every commission that the order generated.
mod ale_api;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod ledger;
pub mod referrals;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use ale_api::{
    account_objects::{NewRegistration, ReferralLink},
    accounts_api::{referral_link, AccountApi},
    catalog_api::{CatalogApi, PackageListing},
    dashboard_api::DashboardApi,
    dashboard_objects::{DashboardStats, ReferralNetwork},
    errors::{AccountApiError, DashboardError, OrderFlowError, PayoutError},
    order_flow_api::OrderFlowApi,
    order_objects,
    payout_api::PayoutApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
