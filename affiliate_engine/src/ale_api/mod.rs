//! # Affiliate ledger engine public API
//!
//! The `ale_api` module exposes the programmatic API for the affiliate ledger.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//!
//! * [`accounts_api`] registers and authenticates users.
//! * [`catalog_api`] seeds and lists the purchasable packages.
//! * [`order_flow_api`] is the settlement engine. It opens orders at the payment gateway and settles them once payment
//!   has been confirmed, paying out referral commissions along the way.
//! * [`dashboard_api`] provides read-only rollups of a user's earnings and referral network.
//! * [`payout_api`] keeps the books on commission payouts.
//!
//! # API usage
//!
//! Every API is created by supplying a database backend that implements the backend traits the API needs.
//!
//! ```rust,ignore
//! use affiliate_engine::{DashboardApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements UserManagement and CommissionManagement
//! let api = DashboardApi::new(db);
//! let stats = api.stats(user_id).await?;
//! ```

pub mod account_objects;
pub mod accounts_api;
pub mod catalog_api;
pub mod dashboard_api;
pub mod dashboard_objects;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod payout_api;
