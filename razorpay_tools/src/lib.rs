mod api;
mod config;
mod error;
mod signature;

mod data_objects;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, RazorpayOrder, RazorpayPayment};
pub use error::RazorpayApiError;
pub use signature::{payment_signature, verify_payment_signature};
