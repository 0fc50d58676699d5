use thiserror::Error;

#[derive(Debug, Error)]
pub enum RazorpayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("The gateway did not respond within {0} seconds")]
    Timeout(u64),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl RazorpayApiError {
    /// Whether the caller might reasonably expect a different outcome by trying again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::RestRequestError(_) | Self::RestResponseError(_) => true,
            Self::QueryError { status, .. } => *status >= 500 || *status == 429,
            Self::Initialization(_) | Self::JsonError(_) => false,
        }
    }
}
