use thiserror::Error;

use crate::{
    db_types::PackageTier,
    traits::{GatewayError, LedgerDatabaseError},
};

//--------------------------------------    OrderFlowError   ---------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Invalid request. {0}")]
    Validation(String),
    #[error("There is no package for the {0} tier")]
    PackageNotFound(PackageTier),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(String),
    #[error("The requested user #{0} does not exist")]
    UserNotFound(i64),
    #[error("The payment signature is invalid")]
    InvalidSignature,
    #[error("Order {0} has already been completed")]
    AlreadyCompleted(String),
    #[error("Payment gateway error. {0}")]
    Gateway(#[from] GatewayError),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerDatabaseError> for OrderFlowError {
    fn from(e: LedgerDatabaseError) -> Self {
        match e {
            LedgerDatabaseError::OrderNotFound(id) => Self::OrderNotFound(id),
            LedgerDatabaseError::OrderAlreadyCompleted(id) => Self::AlreadyCompleted(id),
            LedgerDatabaseError::PackageNotFound(tier) => Self::PackageNotFound(tier),
            LedgerDatabaseError::UserNotFound(id) => Self::UserNotFound(id),
            LedgerDatabaseError::OrderNotPending(id, status) => {
                Self::Validation(format!("Order {id} cannot be confirmed, since its status is {status}"))
            },
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

//--------------------------------------   AccountApiError   ---------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Invalid registration. {0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid referral code")]
    InvalidReferrer,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Inactive user")]
    InactiveUser,
    #[error("The requested user #{0} does not exist")]
    UserNotFound(i64),
    #[error("Could not hash password. {0}")]
    PasswordHash(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerDatabaseError> for AccountApiError {
    fn from(e: LedgerDatabaseError) -> Self {
        match e {
            LedgerDatabaseError::EmailAlreadyExists(_) => Self::EmailTaken,
            LedgerDatabaseError::ReferrerNotFound(_) => Self::InvalidReferrer,
            LedgerDatabaseError::UserNotFound(id) => Self::UserNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

//--------------------------------------    DashboardError   ---------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    #[error("The requested user #{0} does not exist")]
    UserNotFound(i64),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerDatabaseError> for DashboardError {
    fn from(e: LedgerDatabaseError) -> Self {
        match e {
            LedgerDatabaseError::UserNotFound(id) => Self::UserNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

//--------------------------------------     PayoutError     ---------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum PayoutError {
    #[error("Invalid payout request. {0}")]
    Validation(String),
    #[error("The requested payout #{0} does not exist")]
    PayoutNotFound(i64),
    #[error("{0}")]
    AlreadyFinalized(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerDatabaseError> for PayoutError {
    fn from(e: LedgerDatabaseError) -> Self {
        match e {
            LedgerDatabaseError::InvalidPayout(msg) => Self::Validation(msg),
            LedgerDatabaseError::PayoutNotFound(id) => Self::PayoutNotFound(id),
            e @ LedgerDatabaseError::PayoutAlreadyFinalized(..) => Self::AlreadyFinalized(e.to_string()),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}
