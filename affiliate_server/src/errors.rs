use actix_web::{
    error::{JsonPayloadError, ResponseError},
    http::{header::ContentType, StatusCode},
    HttpRequest,
    HttpResponse,
};
use affiliate_engine::{
    traits::{GatewayError, LedgerDatabaseError},
    AccountApiError,
    DashboardError,
    OrderFlowError,
    PayoutError,
};
use log::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Invalid payment signature")]
    InvalidSignature,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Could not issue access token. {0}")]
    CouldNotIssueAccessToken(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("The payment gateway could not complete the request. {0}")]
    GatewayError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::InactiveUser => StatusCode::FORBIDDEN,
                _ => StatusCode::UNAUTHORIZED,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::GatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CouldNotIssueAccessToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Could not validate credentials. {0}")]
    ValidationError(String),
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Inactive user")]
    InactiveUser,
    #[error("User account not found.")]
    AccountNotFound,
}

/// Turns malformed JSON bodies into the same `{"error": ...}` responses as every other failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Rejected request body. {err}");
    ServerError::InvalidRequestBody(err.to_string()).into()
}

impl From<GatewayError> for ServerError {
    fn from(e: GatewayError) -> Self {
        warn!("💳️ Payment gateway error. {e}");
        Self::GatewayError(e.to_string())
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::Validation(msg) => Self::ValidationError(msg),
            OrderFlowError::PackageNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::UserNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::InvalidSignature => Self::InvalidSignature,
            OrderFlowError::AlreadyCompleted(_) => Self::Conflict(e.to_string()),
            OrderFlowError::Gateway(e) => e.into(),
            OrderFlowError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::Validation(msg) => Self::ValidationError(msg),
            AccountApiError::EmailTaken | AccountApiError::InvalidReferrer => Self::ValidationError(e.to_string()),
            AccountApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidCredentials),
            AccountApiError::InactiveUser => Self::AuthenticationError(AuthError::InactiveUser),
            AccountApiError::UserNotFound(_) => Self::AuthenticationError(AuthError::AccountNotFound),
            AccountApiError::PasswordHash(e) => Self::BackendError(e),
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<DashboardError> for ServerError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::UserNotFound(_) => Self::NoRecordFound(e.to_string()),
            DashboardError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<PayoutError> for ServerError {
    fn from(e: PayoutError) -> Self {
        match e {
            PayoutError::Validation(msg) => Self::ValidationError(msg),
            PayoutError::PayoutNotFound(_) => Self::NoRecordFound(e.to_string()),
            PayoutError::AlreadyFinalized(msg) => Self::Conflict(msg),
            PayoutError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<LedgerDatabaseError> for ServerError {
    fn from(e: LedgerDatabaseError) -> Self {
        match e {
            LedgerDatabaseError::UserNotFound(_) |
            LedgerDatabaseError::PackageNotFound(_) |
            LedgerDatabaseError::PackageIdNotFound(_) |
            LedgerDatabaseError::OrderNotFound(_) |
            LedgerDatabaseError::PayoutNotFound(_) => Self::NoRecordFound(e.to_string()),
            LedgerDatabaseError::OrderAlreadyCompleted(_) => Self::Conflict(e.to_string()),
            _ => Self::BackendError(e.to_string()),
        }
    }
}
